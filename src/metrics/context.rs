//! Borrowed view of an incoming request handed to label value providers.

use http::request::Parts;
use http::{Extensions, HeaderMap, Method, Request, Uri, Version};

/// The request state a label value provider may inspect.
///
/// Built from either a full request or its parts, so middleware can create
/// one without consuming the request body.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    method: &'a Method,
    uri: &'a Uri,
    version: Version,
    headers: &'a HeaderMap,
    extensions: &'a Extensions,
}

impl<'a> RequestContext<'a> {
    pub fn method(&self) -> &'a Method {
        self.method
    }

    pub fn uri(&self) -> &'a Uri {
        self.uri
    }

    pub fn path(&self) -> &'a str {
        self.uri.path()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &'a HeaderMap {
        self.headers
    }

    /// Request extensions, e.g. a router's matched path.
    pub fn extensions(&self) -> &'a Extensions {
        self.extensions
    }

    /// Returns a header value if present and valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

impl<'a, B> From<&'a Request<B>> for RequestContext<'a> {
    fn from(request: &'a Request<B>) -> Self {
        RequestContext {
            method: request.method(),
            uri: request.uri(),
            version: request.version(),
            headers: request.headers(),
            extensions: request.extensions(),
        }
    }
}

impl<'a> From<&'a Parts> for RequestContext<'a> {
    fn from(parts: &'a Parts) -> Self {
        RequestContext {
            method: &parts.method,
            uri: &parts.uri,
            version: parts.version,
            headers: &parts.headers,
            extensions: &parts.extensions,
        }
    }
}
