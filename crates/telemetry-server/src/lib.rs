//! Process plumbing shared by the worker and collector binaries.
//!
//! Both processes are small axum servers with the same lifecycle: tracing
//! setup, liveness/readiness probes, a signal-driven shutdown and a bounded
//! grace period for in-flight requests.

pub mod logging;
pub mod ops;
pub mod shutdown;

pub use shutdown::{serve, Shutdown};
