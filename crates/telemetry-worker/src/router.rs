//! Axum router wiring for the worker process.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/start", post(ops::start))
        .route("/stop", post(ops::stop))
        .merge(telemetry_server::ops::probes("OK\n", "READY\n"))
        .with_state(state)
}
