use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{MatchedPath, RawPathParams, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use httpmetrics::metrics::{MetricKind, RequestContext, CODE_LABEL, ENDPOINT_LABEL, METHOD_LABEL};
use httpmetrics::MetricsSettings;

/// One metric update as the middleware would hand it to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub kind: MetricKind,
    pub metric: String,
    pub labels: Vec<(String, String)>,
}

impl Observation {
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(label, _)| label == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Observation>>>);

impl Recorder {
    pub fn observations(&self) -> Vec<Observation> {
        self.0.lock().expect("recorder mutex poisoned").clone()
    }

    pub fn of(&self, kind: MetricKind) -> Vec<Observation> {
        self.observations()
            .into_iter()
            .filter(|observation| observation.kind == kind)
            .collect()
    }

    fn push(&self, observation: Observation) {
        self.0.lock().expect("recorder mutex poisoned").push(observation);
    }
}

#[derive(Clone)]
struct Probe {
    settings: MetricsSettings,
    recorder: Recorder,
}

/// Minimal instrumentation middleware reading its label layout from the settings.
async fn record(
    State(probe): State<Probe>,
    params: Option<RawPathParams>,
    request: Request,
    next: Next,
) -> Response {
    let settings = probe.settings;
    if !settings.should_capture(request.uri().path()) {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_default();
    let route_values: HashMap<String, String> = params
        .map(|params| {
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        })
        .unwrap_or_default();

    let ctx = RequestContext::from(&request);
    let pending: Vec<(MetricKind, Vec<(String, String)>)> = settings
        .enabled_metrics()
        .map(|metric| {
            let mut labels = Vec::new();
            for name in metric.kind().default_labels() {
                match *name {
                    METHOD_LABEL => labels.push((name.to_string(), method.clone())),
                    ENDPOINT_LABEL => labels.push((name.to_string(), endpoint.clone())),
                    _ => {}
                }
            }
            for mapping in metric.route_parameters() {
                let value = route_values
                    .get(&mapping.parameter_name)
                    .cloned()
                    .unwrap_or_default();
                labels.push((mapping.label_name.clone(), value));
            }
            for (name, value) in metric.evaluate_custom_labels(&ctx) {
                labels.push((name.to_string(), value));
            }
            (metric.kind(), labels)
        })
        .collect();

    let response = next.run(request).await;
    let status = response.status().as_u16();

    for (kind, mut labels) in pending {
        let metric = settings.metric(kind);
        if kind.default_labels().contains(&CODE_LABEL) {
            labels.insert(0, (CODE_LABEL.to_string(), metric.status_code_label(status)));
        }
        probe.recorder.push(Observation {
            kind,
            metric: metric.name().to_string(),
            labels,
        });
    }

    response
}

pub fn build_app(settings: MetricsSettings) -> (Router, Recorder) {
    let recorder = Recorder::default();
    let probe = Probe {
        settings,
        recorder: recorder.clone(),
    };

    let app = Router::new()
        .route("/orders/:tenant/:id", get(|| async { "order" }))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route("/metrics", get(|| async { "# exposition" }))
        .layer(middleware::from_fn_with_state(probe, record));

    (app, recorder)
}

pub fn get_request(path: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}
