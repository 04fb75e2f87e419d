//! HTTP mapping for the shared error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use telemetry_core::error::{ClientCode, TelemetryError};

/// Plain-text error response: 400 / 405 / 500.
#[derive(Debug)]
pub struct ApiError(pub TelemetryError);

impl From<TelemetryError> for ApiError {
    fn from(e: TelemetryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0.client_code() {
            ClientCode::BadRequest => (StatusCode::BAD_REQUEST, self.0.to_string()),
            ClientCode::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Only POST allowed".to_string())
            }
            ClientCode::UpstreamWrite => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to write to InfluxDB".to_string(),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
        };
        (status, body).into_response()
    }
}
