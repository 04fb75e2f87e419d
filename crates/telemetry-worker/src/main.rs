//! Worker service: synthetic CPU load plus periodic stats reporting.
//!
//! - `GET /metrics` Prometheus exposition
//! - `POST /start`, `POST /stop` toggle the workload
//! - summaries are POSTed to `API_URL` every report interval

use std::process::ExitCode;

use telemetry_server::{logging, shutdown, Shutdown};
use telemetry_worker::config;

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

    match telemetry_worker::run(cfg, stop).await {
        Ok(()) => {
            tracing::info!("worker-service stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "worker-service failed");
            ExitCode::FAILURE
        }
    }
}
