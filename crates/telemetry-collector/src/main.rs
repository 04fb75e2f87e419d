//! Collector service: `POST /metrics` ingestion into InfluxDB.

use std::process::ExitCode;

use telemetry_collector::config;
use telemetry_server::{logging, shutdown, Shutdown};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    let stop = Shutdown::new();
    shutdown::trigger_on_signal(stop.clone());

    match telemetry_collector::run(cfg, stop).await {
        Ok(()) => {
            tracing::info!("api-service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "api-service failed");
            ExitCode::FAILURE
        }
    }
}
