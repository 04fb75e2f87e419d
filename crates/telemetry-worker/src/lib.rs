//! Telemetry worker library.
//!
//! Wires the synthetic task runner, the shared aggregation counters, the
//! periodic reporter and the control/exposition HTTP surface. Consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod reporter;
pub mod router;
pub mod sensor;
pub mod sync;
pub mod workload;

use std::time::Duration;

use telemetry_core::error::Result;
use telemetry_server::Shutdown;

use crate::config::WorkerConfig;
use crate::reporter::Reporter;
use crate::sensor::SysinfoSensor;
use crate::workload::{TaskRunner, WorkerContext};

/// Run the worker process until `shutdown` fires.
pub async fn run(cfg: WorkerConfig, shutdown: Shutdown) -> Result<()> {
    let listener = telemetry_server::shutdown::bind(&cfg.listen).await?;
    let state = app_state::AppState::new();

    let reporter = Reporter::new(
        state.aggregation(),
        Box::new(SysinfoSensor::new()),
        cfg.api_url.clone(),
        cfg.service_name.clone(),
        Duration::from_millis(cfg.request_timeout_ms),
    )?;

    let ctx = WorkerContext {
        state: state.aggregation(),
        activity: state.activity(),
        metrics: state.metrics(),
        iterations: cfg.task_iterations,
        idle_sleep: Duration::from_millis(cfg.idle_sleep_ms),
    };
    let runner = TaskRunner::spawn(cfg.workers, ctx, shutdown.clone());

    let reporter = tokio::spawn(
        reporter.run(Duration::from_millis(cfg.report_interval_ms), shutdown.clone()),
    );

    tracing::info!(listen = %cfg.listen, "worker-service starting");
    let app = router::build_router(state);
    let grace = Duration::from_millis(cfg.shutdown_grace_ms);
    let served = telemetry_server::serve(listener, app, shutdown.clone(), grace).await;
    // The server may also exit on its own; workers and reporter stop either way.
    shutdown.trigger();

    if tokio::time::timeout(grace, async {
        let _ = reporter.await;
        runner.join().await;
    })
    .await
    .is_err()
    {
        tracing::warn!("background tasks still running after grace period");
    }

    served
}
