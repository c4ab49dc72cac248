//! Frozen, validated metrics settings read by the instrumentation middleware.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::context::RequestContext;
use super::kind::MetricKind;
use super::labels::{is_valid_metric_name, validate_label_name, LabelProviders};
use super::options::{HttpMetricOptions, MetricsOptions};
use super::route::RouteParameterMapping;
use crate::error::{Error, Result};

/// Validated settings for one HTTP metric.
#[derive(Debug)]
pub struct MetricSettings {
    kind: MetricKind,
    enabled: bool,
    name: String,
    help: String,
    label_names: Vec<String>,
    route_parameters: Vec<RouteParameterMapping>,
    custom_labels: LabelProviders,
    reduce_status_code_cardinality: bool,
    buckets: Vec<f64>,
}

impl MetricSettings {
    fn from_options(options: HttpMetricOptions) -> Result<Self> {
        let kind = options.kind();
        if !is_valid_metric_name(&options.name) {
            return Err(Error::InvalidMetricName(options.name));
        }

        let mut label_names: Vec<String> = kind
            .default_labels()
            .iter()
            .map(|label| label.to_string())
            .collect();
        label_names.extend(
            options
                .additional_route_parameters
                .iter()
                .map(|mapping| mapping.label_name.clone()),
        );
        label_names.extend(options.additional_labels.names().map(str::to_string));

        let mut seen = HashSet::with_capacity(label_names.len());
        for label in &label_names {
            validate_label_name(label).map_err(|reason| Error::InvalidLabelName {
                name: label.clone(),
                reason,
            })?;
            if !seen.insert(label.as_str()) {
                return Err(Error::DuplicateLabel {
                    kind,
                    label: label.clone(),
                });
            }
        }

        let buckets = match options.buckets {
            Some(buckets) => {
                validate_buckets(kind, &buckets)?;
                buckets
            }
            None => Vec::new(),
        };

        debug!(
            kind = %kind,
            metric = %options.name,
            enabled = options.enabled,
            labels = ?label_names,
            "HTTP metric settings finalized"
        );

        Ok(MetricSettings {
            kind,
            enabled: options.enabled,
            name: options.name,
            help: options.help,
            label_names,
            route_parameters: options.additional_route_parameters,
            custom_labels: options.additional_labels,
            reduce_status_code_cardinality: options.reduce_status_code_cardinality,
            buckets,
        })
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Full label set: default labels, then route parameters, then custom labels.
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn route_parameters(&self) -> &[RouteParameterMapping] {
        &self.route_parameters
    }

    pub fn custom_labels(&self) -> &LabelProviders {
        &self.custom_labels
    }

    /// Evaluates the custom label providers for one request.
    pub fn evaluate_custom_labels(&self, request: &RequestContext<'_>) -> Vec<(&str, String)> {
        self.custom_labels.evaluate(request)
    }

    /// Value of the `code` label for a response status.
    pub fn status_code_label(&self, status: u16) -> String {
        if self.reduce_status_code_cardinality {
            format!("{}xx", status / 100)
        } else {
            status.to_string()
        }
    }

    /// Histogram bucket boundaries; empty unless this is the duration histogram.
    pub fn buckets(&self) -> &[f64] {
        &self.buckets
    }
}

fn validate_buckets(kind: MetricKind, buckets: &[f64]) -> Result<()> {
    let invalid = |reason| Err(Error::InvalidBuckets { kind, reason });
    if !kind.is_histogram() {
        return invalid("only the request_duration metric is a histogram");
    }
    if buckets.is_empty() {
        return invalid("at least one bucket is required");
    }
    if buckets.iter().any(|bound| !bound.is_finite()) {
        return invalid("bucket bounds must be finite");
    }
    if buckets.windows(2).any(|pair| pair[0] >= pair[1]) {
        return invalid("bucket bounds must be strictly increasing");
    }
    Ok(())
}

#[derive(Debug)]
struct Inner {
    capture_metrics_url: bool,
    metrics_path: String,
    metrics: [MetricSettings; 3],
}

/// Immutable HTTP metrics settings, produced by [`MetricsOptions::build`].
///
/// Cheap to clone and safe to share between request handlers.
#[derive(Debug, Clone)]
pub struct MetricsSettings {
    inner: Arc<Inner>,
}

impl TryFrom<MetricsOptions> for MetricsSettings {
    type Error = Error;

    fn try_from(options: MetricsOptions) -> Result<Self> {
        if !options.metrics_path.starts_with('/') {
            return Err(Error::InvalidMetricsPath(options.metrics_path));
        }

        let metrics = [
            MetricSettings::from_options(options.in_progress)?,
            MetricSettings::from_options(options.request_count)?,
            MetricSettings::from_options(options.request_duration)?,
        ];

        Ok(MetricsSettings {
            inner: Arc::new(Inner {
                capture_metrics_url: options.capture_metrics_url,
                metrics_path: options.metrics_path,
                metrics,
            }),
        })
    }
}

impl MetricsSettings {
    pub fn capture_metrics_url(&self) -> bool {
        self.inner.capture_metrics_url
    }

    pub fn metrics_path(&self) -> &str {
        &self.inner.metrics_path
    }

    /// Whether a request to `path` should be recorded at all.
    ///
    /// Requests under the metrics path are skipped unless
    /// `capture_metrics_url` is set.
    pub fn should_capture(&self, path: &str) -> bool {
        self.inner.capture_metrics_url || !path.starts_with(self.inner.metrics_path.as_str())
    }

    pub fn metric(&self, kind: MetricKind) -> &MetricSettings {
        let index = match kind {
            MetricKind::InProgress => 0,
            MetricKind::RequestCount => 1,
            MetricKind::RequestDuration => 2,
        };
        &self.inner.metrics[index]
    }

    pub fn in_progress(&self) -> &MetricSettings {
        self.metric(MetricKind::InProgress)
    }

    pub fn request_count(&self) -> &MetricSettings {
        self.metric(MetricKind::RequestCount)
    }

    pub fn request_duration(&self) -> &MetricSettings {
        self.metric(MetricKind::RequestDuration)
    }

    pub fn metrics(&self) -> impl Iterator<Item = &MetricSettings> {
        self.inner.metrics.iter()
    }

    pub fn enabled_metrics(&self) -> impl Iterator<Item = &MetricSettings> {
        self.metrics().filter(|metric| metric.is_enabled())
    }
}
