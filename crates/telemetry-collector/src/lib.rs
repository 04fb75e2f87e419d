//! Telemetry collector library.
//!
//! HTTP ingestion of Metrics Summaries into a time-series store. Consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod ingest;
pub mod router;
pub mod storage;

use std::time::Duration;

use telemetry_core::error::Result;
use telemetry_server::Shutdown;

use crate::config::CollectorConfig;

/// Run the collector process until `shutdown` fires.
pub async fn run(cfg: CollectorConfig, shutdown: Shutdown) -> Result<()> {
    let listener = telemetry_server::shutdown::bind(&cfg.listen).await?;
    let sink = storage::from_config(&cfg.storage)?;

    tracing::info!(listen = %cfg.listen, storage = ?cfg.storage.kind, "api-service starting");
    let app = router::build_router(app_state::AppState::new(sink));

    telemetry_server::serve(listener, app, shutdown, Duration::from_millis(cfg.shutdown_grace_ms)).await
}
