//! telemetry core: runtime-free contracts shared by the worker and the collector.
//!
//! This crate defines the Metrics Summary wire shape, its validation rules, the
//! time-series point model written by the collector, and the error surface
//! shared by both processes. It carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input must surface as `TelemetryError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{Result, TelemetryError};
pub use model::{MetricsSummary, Point};
