//! Operational HTTP endpoints.
//!
//! - `/health` : liveness
//! - `/ready`  : readiness
//!
//! Bodies differ per process, so handlers are built from a fixed string.

use axum::{http::StatusCode, routing::get, Router};

/// Router with `GET /health` and `GET /ready` answering 200 with fixed bodies.
pub fn probes<S>(health_body: &'static str, ready_body: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(move || async move { (StatusCode::OK, health_body) }))
        .route("/ready", get(move || async move { (StatusCode::OK, ready_body) }))
}
