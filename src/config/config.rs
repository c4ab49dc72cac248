use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::metrics::MetricsConfig;
use crate::error::Result;

/// Prefix of environment variables overriding the file, e.g.
/// `HTTPMETRICS_METRICS__CAPTURE_METRICS_URL=true`.
pub const ENV_PREFIX: &str = "HTTPMETRICS_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// The figment used by [`load_config`]: the YAML file, then environment overrides.
pub fn config_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load config from a YAML file, applying environment overrides.
pub fn load_config(path: &Path) -> Result<ConfigV1> {
    load_from(config_figment(path))
}

pub fn load_from(figment: Figment) -> Result<ConfigV1> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// JSON schema for the configuration file.
pub fn schema_json() -> serde_json::Result<String> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}
