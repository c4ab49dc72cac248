//! The closed set of HTTP metrics the middleware records.

use std::fmt;

/// Label carrying the response status code.
pub const CODE_LABEL: &str = "code";
/// Label carrying the request method.
pub const METHOD_LABEL: &str = "method";
/// Label carrying the matched route template.
pub const ENDPOINT_LABEL: &str = "endpoint";

/// One of the three HTTP metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Gauge of requests currently being handled.
    InProgress,
    /// Counter of completed requests.
    RequestCount,
    /// Histogram of request durations in seconds.
    RequestDuration,
}

impl MetricKind {
    /// Every kind, in the order sub-configurations are visited.
    pub const ALL: [MetricKind; 3] = [
        MetricKind::InProgress,
        MetricKind::RequestCount,
        MetricKind::RequestDuration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::InProgress => "in_progress",
            MetricKind::RequestCount => "request_count",
            MetricKind::RequestDuration => "request_duration",
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            MetricKind::InProgress => "http_requests_in_progress",
            MetricKind::RequestCount => "http_requests_received_total",
            MetricKind::RequestDuration => "http_request_duration_seconds",
        }
    }

    pub fn default_help(&self) -> &'static str {
        match self {
            MetricKind::InProgress => "Number of HTTP requests currently being handled",
            MetricKind::RequestCount => "Total number of HTTP requests that have been handled",
            MetricKind::RequestDuration => "Duration of handled HTTP requests in seconds",
        }
    }

    /// Labels the middleware always attaches, before any configured ones.
    ///
    /// The in-progress gauge is updated before a response exists, so it
    /// carries no status code.
    pub fn default_labels(&self) -> &'static [&'static str] {
        match self {
            MetricKind::InProgress => &[METHOD_LABEL, ENDPOINT_LABEL],
            MetricKind::RequestCount | MetricKind::RequestDuration => {
                &[CODE_LABEL, METHOD_LABEL, ENDPOINT_LABEL]
            }
        }
    }

    pub fn is_histogram(&self) -> bool {
        matches!(self, MetricKind::RequestDuration)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates `count` buckets, the first at `start`, each `factor` times the last.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Vec<f64> {
    std::iter::successors(Some(start), |prev| Some(prev * factor))
        .take(count)
        .collect()
}

/// Default request duration buckets: 1ms doubling up to roughly 33s.
pub fn default_duration_buckets() -> Vec<f64> {
    exponential_buckets(0.001, 2.0, 16)
}
