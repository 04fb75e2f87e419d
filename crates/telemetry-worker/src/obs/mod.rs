//! In-process Prometheus metrics for the worker.
//!
//! Counters and histograms are plain atomics rendered on demand by the
//! `GET /metrics` handler.

pub mod metrics;

pub use metrics::WorkerMetrics;
