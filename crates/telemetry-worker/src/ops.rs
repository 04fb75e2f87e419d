//! Worker HTTP endpoints.
//!
//! - `GET /metrics` : Prometheus text format
//! - `POST /start`  : set the activity flag
//! - `POST /stop`   : clear the activity flag
//!
//! Control endpoints return as soon as the flag is written; workers pick the
//! change up on their next iteration.

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn start(State(state): State<AppState>) -> impl IntoResponse {
    state.activity().start();
    tracing::info!("workload started");
    (StatusCode::OK, "Workload started\n")
}

pub async fn stop(State(state): State<AppState>) -> impl IntoResponse {
    state.activity().stop();
    tracing::info!("workload stopped");
    (StatusCode::OK, "Workload stopped\n")
}
