//! Task runner: N workers repeatedly executing a fixed computation.
//!
//! Workers run on the blocking pool since each iteration is pure CPU work.
//! Cancellation is cooperative and checked between iterations, so a computation
//! in progress always completes and is recorded.

use std::hint::black_box;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio::task::JoinHandle;

use telemetry_server::Shutdown;

use super::state::{ActivityFlag, AggregationState};
use crate::obs::WorkerMetrics;

/// Deterministic busy work: sum of square roots of `0..iterations`.
pub fn synthetic_task(iterations: u64) -> f64 {
    let mut x = 0.0001_f64;
    for i in 0..iterations {
        x += (black_box(i) as f64).sqrt();
    }
    black_box(x)
}

/// Everything a worker touches, shared by reference.
#[derive(Clone)]
pub struct WorkerContext {
    pub state: Arc<AggregationState>,
    pub activity: Arc<ActivityFlag>,
    pub metrics: Arc<WorkerMetrics>,
    pub iterations: u64,
    pub idle_sleep: Duration,
}

/// Worker loop. Returns once `shutdown` is observed at an iteration boundary.
pub fn run_worker(id: usize, ctx: &WorkerContext, shutdown: &Shutdown) {
    tracing::debug!(worker = id, "worker started");

    while !shutdown.is_triggered() {
        if !ctx.activity.is_active() {
            std::thread::sleep(ctx.idle_sleep);
            continue;
        }

        let start = Instant::now();
        synthetic_task(ctx.iterations);
        let elapsed = start.elapsed();

        ctx.state.record(elapsed);
        ctx.metrics.record_task(elapsed);
    }

    tracing::debug!(worker = id, "worker stopped");
}

/// Handles to the spawned workers.
pub struct TaskRunner {
    handles: Vec<JoinHandle<()>>,
}

impl TaskRunner {
    pub fn spawn(workers: usize, ctx: WorkerContext, shutdown: Shutdown) -> Self {
        let handles = (0..workers)
            .map(|id| {
                let ctx = ctx.clone();
                let shutdown = shutdown.clone();
                tokio::task::spawn_blocking(move || run_worker(id, &ctx, &shutdown))
            })
            .collect();

        tracing::info!(workers, iterations = ctx.iterations, "task runner started");
        Self { handles }
    }

    /// Wait for every worker to exit. Call after triggering shutdown.
    pub async fn join(self) {
        for res in join_all(self.handles).await {
            if let Err(e) = res {
                tracing::error!(error = %e, "worker task failed");
            }
        }
    }
}
