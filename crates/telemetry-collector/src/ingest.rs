//! `POST /metrics`: accept a Metrics Summary and persist one point per metric.
//!
//! Per request: parse -> validate -> write each point in order. The first failed
//! write ends the request with a 500; points already written stay written.

use axum::{extract::State, http::StatusCode};
use bytes::Bytes;

use telemetry_core::error::{Result, TelemetryError};
use telemetry_core::{MetricsSummary, Point};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::storage::PointSink;

pub async fn ingest(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<(StatusCode, &'static str), ApiError> {
    let summary: MetricsSummary = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting malformed summary");
        TelemetryError::Validation("Invalid JSON".into())
    })?;

    let service = summary.service_name.clone();
    let points = summary.into_points()?;

    persist(state.sink().as_ref(), &points).await?;

    tracing::debug!(service = %service, points = points.len(), "summary persisted");
    Ok((StatusCode::ACCEPTED, "Metrics stored"))
}

/// Any method other than POST on the ingestion route.
pub async fn method_not_allowed() -> ApiError {
    ApiError(TelemetryError::MethodNotAllowed)
}

/// Write `points` sequentially, stopping at the first failure.
pub async fn persist(sink: &dyn PointSink, points: &[Point]) -> Result<()> {
    for p in points {
        tracing::info!(metric = %p.measurement, value = p.value, "Received metric");
        if let Err(e) = sink.write_point(p).await {
            tracing::error!(metric = %p.measurement, error = %e, "storage write failed");
            return Err(e);
        }
    }
    Ok(())
}
