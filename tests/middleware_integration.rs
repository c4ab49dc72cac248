mod common;

use common::{build_app, get_request};
use httpmetrics::metrics::MetricKind;
use httpmetrics::MetricsOptions;
use tower::ServiceExt;

fn labels(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[tokio::test]
async fn records_route_parameters_and_custom_labels_on_every_metric() {
    let mut options = MetricsOptions::new();
    options.add_route_parameter("tenant");
    options.add_route_parameter(("id", "order_id"));
    options
        .add_label("region", |req| {
            req.header("x-region").unwrap_or("none").to_string()
        })
        .unwrap();
    let (app, recorder) = build_app(options.build().unwrap());

    let mut request = get_request("/orders/acme/42");
    request
        .headers_mut()
        .insert("x-region", "eu-west".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 200);

    let count = recorder.of(MetricKind::RequestCount);
    assert_eq!(count.len(), 1);
    assert_eq!(count[0].metric, "http_requests_received_total");
    assert_eq!(
        count[0].labels,
        labels(&[
            ("code", "200"),
            ("method", "GET"),
            ("endpoint", "/orders/:tenant/:id"),
            ("tenant", "acme"),
            ("order_id", "42"),
            ("region", "eu-west"),
        ])
    );

    let in_progress = recorder.of(MetricKind::InProgress);
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].label("code"), None);
    assert_eq!(in_progress[0].label("order_id"), Some("42"));

    let duration = recorder.of(MetricKind::RequestDuration);
    assert_eq!(duration[0].label("region"), Some("eu-west"));
}

#[tokio::test]
async fn recorded_labels_follow_the_declared_label_set() {
    let mut options = MetricsOptions::new();
    options.add_route_parameter("tenant");
    options.add_label("env", |_| "prod".to_string()).unwrap();
    let settings = options.build().unwrap();
    let (app, recorder) = build_app(settings.clone());

    app.oneshot(get_request("/orders/acme/1")).await.unwrap();

    let observations = recorder.observations();
    assert_eq!(observations.len(), 3);
    for observation in observations {
        let declared: Vec<&str> = settings
            .metric(observation.kind)
            .label_names()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(observation.label_names(), declared);
    }
}

#[tokio::test]
async fn metrics_endpoint_is_skipped_by_default() {
    let (app, recorder) = build_app(MetricsOptions::new().build().unwrap());

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(recorder.observations().is_empty());
}

#[tokio::test]
async fn metrics_endpoint_is_recorded_when_captured() {
    let mut options = MetricsOptions::new();
    options.capture_metrics_url = true;
    let (app, recorder) = build_app(options.build().unwrap());

    app.oneshot(get_request("/metrics")).await.unwrap();

    let count = recorder.of(MetricKind::RequestCount);
    assert_eq!(count.len(), 1);
    assert_eq!(count[0].label("endpoint"), Some("/metrics"));
}

#[tokio::test]
async fn overwritten_label_reports_latest_provider() {
    let mut options = MetricsOptions::new();
    options.add_label("env", |_| "prod".to_string()).unwrap();
    options.add_label("env", |_| "staging".to_string()).unwrap();
    let (app, recorder) = build_app(options.build().unwrap());

    app.oneshot(get_request("/orders/acme/7")).await.unwrap();

    for observation in recorder.observations() {
        assert_eq!(observation.label("env"), Some("staging"));
        assert_eq!(
            observation.label_names().iter().filter(|name| **name == "env").count(),
            1
        );
    }
}

#[tokio::test]
async fn status_codes_reduced_only_where_configured() {
    let mut options = MetricsOptions::new();
    options.request_count.reduce_status_code_cardinality = true;
    let (app, recorder) = build_app(options.build().unwrap());

    let response = app.oneshot(get_request("/missing")).await.unwrap();
    assert_eq!(response.status(), 404);

    assert_eq!(
        recorder.of(MetricKind::RequestCount)[0].label("code"),
        Some("4xx")
    );
    assert_eq!(
        recorder.of(MetricKind::RequestDuration)[0].label("code"),
        Some("404")
    );
}

#[tokio::test]
async fn disabled_metric_is_not_recorded() {
    let mut options = MetricsOptions::new();
    options.in_progress.enabled = false;
    let (app, recorder) = build_app(options.build().unwrap());

    app.oneshot(get_request("/orders/acme/1")).await.unwrap();

    assert!(recorder.of(MetricKind::InProgress).is_empty());
    assert_eq!(recorder.observations().len(), 2);
}
