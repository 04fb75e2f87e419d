//! Synthetic CPU-bound workload and the counters it feeds.

pub mod runner;
pub mod state;

pub use runner::{run_worker, synthetic_task, TaskRunner, WorkerContext};
pub use state::{ActivityFlag, AggregationState, Snapshot};
