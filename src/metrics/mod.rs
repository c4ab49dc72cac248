//! HTTP metrics options for request instrumentation middleware.
//!
//! [`MetricsOptions`] is filled in during startup: one sub-configuration per
//! metric (in-progress gauge, request counter, request duration histogram)
//! plus helpers that apply a route parameter or label to all three at once.
//! [`MetricsOptions::build`] validates the result and freezes it into
//! [`MetricsSettings`], which the middleware reads on every request.
//!
//! ```
//! use httpmetrics::metrics::MetricsOptions;
//!
//! let mut options = MetricsOptions::new();
//! options.add_route_parameter("tenant");
//! options.add_label("env", |_| "prod".to_string()).unwrap();
//!
//! let settings = options.build().unwrap();
//! assert!(!settings.should_capture("/metrics"));
//! assert_eq!(
//!     settings.request_count().label_names(),
//!     ["code", "method", "endpoint", "tenant", "env"]
//! );
//! ```

mod context;
mod kind;
mod labels;
mod options;
mod route;
mod settings;

pub use context::RequestContext;
pub use kind::{
    default_duration_buckets, exponential_buckets, MetricKind, CODE_LABEL, ENDPOINT_LABEL,
    METHOD_LABEL,
};
pub use labels::{
    is_valid_metric_name, validate_label_name, LabelNameViolation, LabelProviders,
    LabelValueProvider, StaticValue,
};
pub use options::{HttpMetricOptions, MetricsOptions, DEFAULT_METRICS_PATH};
pub use route::RouteParameterMapping;
pub use settings::{MetricSettings, MetricsSettings};
