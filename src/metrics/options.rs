//! Mutable HTTP metrics options, filled in during application setup.

use std::sync::Arc;

use tracing::debug;

use super::context::RequestContext;
use super::kind::{default_duration_buckets, MetricKind};
use super::labels::{validate_label_name, LabelProviders, LabelValueProvider};
use super::route::RouteParameterMapping;
use super::settings::MetricsSettings;
use crate::error::{Error, Result};

/// Default path of the metrics exposition endpoint.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Options for one of the HTTP metrics.
#[derive(Debug, Clone)]
pub struct HttpMetricOptions {
    kind: MetricKind,
    /// Whether the middleware records this metric at all.
    pub enabled: bool,
    pub name: String,
    pub help: String,
    /// Route parameters published as labels, in extraction order.
    pub additional_route_parameters: Vec<RouteParameterMapping>,
    /// Labels computed from the request by a provider.
    pub additional_labels: LabelProviders,
    /// Report status codes as `2xx`, `4xx`, ... instead of the exact code.
    pub reduce_status_code_cardinality: bool,
    /// Histogram bucket boundaries; only meaningful for request duration.
    pub buckets: Option<Vec<f64>>,
}

impl HttpMetricOptions {
    pub fn new(kind: MetricKind) -> Self {
        HttpMetricOptions {
            kind,
            enabled: true,
            name: kind.default_name().to_string(),
            help: kind.default_help().to_string(),
            additional_route_parameters: Vec::new(),
            additional_labels: LabelProviders::new(),
            reduce_status_code_cardinality: false,
            buckets: kind.is_histogram().then(default_duration_buckets),
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }
}

/// Settings for the HTTP metrics middleware.
///
/// Built once during startup, optionally adjusted through the fan-out
/// helpers or by editing a sub-configuration directly, then frozen with
/// [`MetricsOptions::build`] before requests are served.
#[derive(Debug, Clone)]
pub struct MetricsOptions {
    pub in_progress: HttpMetricOptions,
    pub request_count: HttpMetricOptions,
    pub request_duration: HttpMetricOptions,
    /// Whether requests to the metrics endpoint itself are recorded.
    pub capture_metrics_url: bool,
    /// Path prefix identifying the metrics endpoint.
    pub metrics_path: String,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        MetricsOptions {
            in_progress: HttpMetricOptions::new(MetricKind::InProgress),
            request_count: HttpMetricOptions::new(MetricKind::RequestCount),
            request_duration: HttpMetricOptions::new(MetricKind::RequestDuration),
            capture_metrics_url: false,
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
        }
    }
}

impl MetricsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: MetricKind) -> &HttpMetricOptions {
        match kind {
            MetricKind::InProgress => &self.in_progress,
            MetricKind::RequestCount => &self.request_count,
            MetricKind::RequestDuration => &self.request_duration,
        }
    }

    pub fn get_mut(&mut self, kind: MetricKind) -> &mut HttpMetricOptions {
        match kind {
            MetricKind::InProgress => &mut self.in_progress,
            MetricKind::RequestCount => &mut self.request_count,
            MetricKind::RequestDuration => &mut self.request_duration,
        }
    }

    /// Applies `f` to every metric's options, in [`MetricKind::ALL`] order.
    pub fn for_each_metric<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut HttpMetricOptions),
    {
        for kind in MetricKind::ALL {
            f(self.get_mut(kind));
        }
    }

    /// Adds a route parameter label to all HTTP metrics.
    pub fn add_route_parameter(&mut self, mapping: impl Into<RouteParameterMapping>) {
        let mapping = mapping.into();
        debug!(
            parameter = %mapping.parameter_name,
            label = %mapping.label_name,
            "Adding route parameter to HTTP metrics"
        );
        self.for_each_metric(|metric| metric.additional_route_parameters.push(mapping.clone()));
    }

    /// Adds a label computed by `value_provider` to all HTTP metrics.
    ///
    /// The name is validated before anything is touched, so a rejected name
    /// leaves every metric unchanged. An existing label with the same name
    /// is replaced.
    pub fn add_label<F>(&mut self, label_name: impl Into<String>, value_provider: F) -> Result<()>
    where
        F: Fn(&RequestContext<'_>) -> String + Send + Sync + 'static,
    {
        self.add_label_provider(label_name, Arc::new(value_provider))
    }

    /// Like [`add_label`](Self::add_label), for a provider that is already shared.
    pub fn add_label_provider(
        &mut self,
        label_name: impl Into<String>,
        provider: Arc<dyn LabelValueProvider>,
    ) -> Result<()> {
        let label_name = label_name.into();
        validate_label_name(&label_name).map_err(|reason| Error::InvalidLabelName {
            name: label_name.clone(),
            reason,
        })?;

        debug!(label = %label_name, "Adding label to HTTP metrics");
        self.for_each_metric(|metric| {
            metric
                .additional_labels
                .insert(label_name.clone(), provider.clone());
        });
        Ok(())
    }

    /// Validates the options and freezes them for use by the middleware.
    pub fn build(self) -> Result<MetricsSettings> {
        MetricsSettings::try_from(self)
    }
}
