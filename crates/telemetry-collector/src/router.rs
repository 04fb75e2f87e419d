//! Axum router wiring for the collector process.

use axum::{routing::post, Router};

use crate::{app_state::AppState, ingest};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/metrics",
            post(ingest::ingest).fallback(ingest::method_not_allowed),
        )
        .merge(telemetry_server::ops::probes("OK", "OK"))
        .with_state(state)
}
