//! Error type shared by the options, configuration and logging layers.

use crate::metrics::{LabelNameViolation, MetricKind};

/// Errors raised while configuring HTTP metrics.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A label name does not follow the metric system's naming rules.
    #[error("invalid label name '{name}': {reason}")]
    InvalidLabelName {
        name: String,
        reason: LabelNameViolation,
    },

    #[error("invalid metric name '{0}'")]
    InvalidMetricName(String),

    /// The same label name ends up twice in one metric's label set.
    #[error("label '{label}' is declared more than once on the {kind} metric")]
    DuplicateLabel { kind: MetricKind, label: String },

    #[error("invalid histogram buckets for the {kind} metric: {reason}")]
    InvalidBuckets {
        kind: MetricKind,
        reason: &'static str,
    },

    #[error("invalid metrics path '{0}': must start with '/'")]
    InvalidMetricsPath(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
