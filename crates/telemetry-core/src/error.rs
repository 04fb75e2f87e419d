//! Shared error type across telemetry crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed body or missing required fields.
    BadRequest,
    /// Wrong HTTP method for the route.
    MethodNotAllowed,
    /// Storage backend rejected a write.
    UpstreamWrite,
    /// A reporting cycle could not complete.
    ReportFailed,
    /// Process could not start (bind failure etc).
    Startup,
    /// Invalid configuration.
    Config,
}

impl ClientCode {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ClientCode::UpstreamWrite => "UPSTREAM_WRITE",
            ClientCode::ReportFailed => "REPORT_FAILED",
            ClientCode::Startup => "STARTUP",
            ClientCode::Config => "CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Unified error type used by the worker and the collector.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("{0}")]
    Validation(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("storage write failed: {0}")]
    UpstreamWrite(String),
    #[error("report failed: {0}")]
    TransientReport(String),
    #[error("startup failed: {0}")]
    Startup(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl TelemetryError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TelemetryError::Validation(_) => ClientCode::BadRequest,
            TelemetryError::MethodNotAllowed => ClientCode::MethodNotAllowed,
            TelemetryError::UpstreamWrite(_) => ClientCode::UpstreamWrite,
            TelemetryError::TransientReport(_) => ClientCode::ReportFailed,
            TelemetryError::Startup(_) => ClientCode::Startup,
            TelemetryError::Config(_) => ClientCode::Config,
        }
    }
}
