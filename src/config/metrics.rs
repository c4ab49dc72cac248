use std::collections::BTreeMap;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{
    HttpMetricOptions, MetricKind, MetricsOptions, RouteParameterMapping, StaticValue,
    DEFAULT_METRICS_PATH,
};

/// The `metrics` section of the configuration file.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(default)]
pub struct MetricsConfig {
    /// Record requests to the metrics endpoint itself.
    pub capture_metrics_url: bool,
    /// Path prefix of the metrics endpoint.
    pub metrics_path: String,
    /// Route parameters added to every metric, in order.
    pub route_parameters: Vec<RouteParameterConfig>,
    /// Constant labels added to every metric.
    pub static_labels: BTreeMap<String, String>,
    pub in_progress: MetricKindConfig,
    pub request_count: MetricKindConfig,
    pub request_duration: MetricKindConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            capture_metrics_url: false,
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
            route_parameters: Vec::new(),
            static_labels: BTreeMap::new(),
            in_progress: MetricKindConfig::default(),
            request_count: MetricKindConfig::default(),
            request_duration: MetricKindConfig::default(),
        }
    }
}

/// A route parameter given either by name, or as a parameter/label pair.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum RouteParameterConfig {
    Name(String),
    Mapping(RouteParameterMapping),
}

impl From<&RouteParameterConfig> for RouteParameterMapping {
    fn from(config: &RouteParameterConfig) -> Self {
        match config {
            RouteParameterConfig::Name(name) => RouteParameterMapping::from(name.as_str()),
            RouteParameterConfig::Mapping(mapping) => mapping.clone(),
        }
    }
}

/// Per-metric overrides; unset fields keep the metric's defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(default)]
pub struct MetricKindConfig {
    pub enabled: bool,
    pub name: Option<String>,
    pub help: Option<String>,
    pub reduce_status_code_cardinality: bool,
    pub buckets: Option<Vec<f64>>,
}

impl Default for MetricKindConfig {
    fn default() -> Self {
        MetricKindConfig {
            enabled: true,
            name: None,
            help: None,
            reduce_status_code_cardinality: false,
            buckets: None,
        }
    }
}

impl MetricKindConfig {
    fn apply(&self, metric: &mut HttpMetricOptions) {
        metric.enabled = self.enabled;
        metric.reduce_status_code_cardinality = self.reduce_status_code_cardinality;
        if let Some(name) = &self.name {
            metric.name = name.clone();
        }
        if let Some(help) = &self.help {
            metric.help = help.clone();
        }
        if let Some(buckets) = &self.buckets {
            metric.buckets = Some(buckets.clone());
        }
    }
}

impl MetricsConfig {
    pub fn kind(&self, kind: MetricKind) -> &MetricKindConfig {
        match kind {
            MetricKind::InProgress => &self.in_progress,
            MetricKind::RequestCount => &self.request_count,
            MetricKind::RequestDuration => &self.request_duration,
        }
    }

    /// Translates the file configuration into [`MetricsOptions`].
    ///
    /// Static labels go through [`MetricsOptions::add_label_provider`], so
    /// an invalid label name in the file fails here.
    pub fn to_options(&self) -> Result<MetricsOptions> {
        let mut options = MetricsOptions::new();
        options.capture_metrics_url = self.capture_metrics_url;
        options.metrics_path = self.metrics_path.clone();

        for kind in MetricKind::ALL {
            self.kind(kind).apply(options.get_mut(kind));
        }
        for parameter in &self.route_parameters {
            options.add_route_parameter(RouteParameterMapping::from(parameter));
        }
        for (name, value) in &self.static_labels {
            options.add_label_provider(name.as_str(), Arc::new(StaticValue::new(value.as_str())))?;
        }
        Ok(options)
    }
}
