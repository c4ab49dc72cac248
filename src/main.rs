use std::path::PathBuf;
use std::process::ExitCode;

use httpmetrics::config::{load_config, schema_json};
use httpmetrics::utils::init_logging;
use tracing::{error, info};

// -- Entrypoint

/// `httpmetrics [CONFIG_PATH]` validates a configuration file and logs the
/// resulting metric label sets; `httpmetrics --schema` prints its JSON schema.
fn main() -> ExitCode {
    let arg = std::env::args().nth(1);

    if arg.as_deref() == Some("--schema") {
        return match schema_json() {
            Ok(schema) => {
                println!("{}", schema);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error rendering schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config_path = arg
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./config.yaml"));

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let settings = match config.metrics.to_options().and_then(|options| options.build()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, config_path = ?config_path, "Invalid metrics configuration");
            return ExitCode::FAILURE;
        }
    };

    for metric in settings.metrics() {
        info!(
            kind = %metric.kind(),
            metric = metric.name(),
            enabled = metric.is_enabled(),
            labels = ?metric.label_names(),
            "HTTP metric configured"
        );
    }
    info!(
        capture_metrics_url = settings.capture_metrics_url(),
        metrics_path = settings.metrics_path(),
        "Metrics configuration is valid"
    );

    ExitCode::SUCCESS
}
