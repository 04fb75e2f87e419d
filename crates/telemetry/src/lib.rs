//! Top-level facade crate for the telemetry demo.
//!
//! Re-exports the shared contracts, the worker and the collector so users can depend on a single crate.

pub mod core {
    pub use telemetry_core::*;
}

pub mod server {
    pub use telemetry_server::*;
}

pub mod worker {
    pub use telemetry_worker::*;
}

pub mod collector {
    pub use telemetry_collector::*;
}
