//! Shared application state for the worker HTTP surface.

use std::sync::Arc;

use crate::obs::WorkerMetrics;
use crate::workload::{ActivityFlag, AggregationState};

#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Default)]
struct AppStateInner {
    aggregation: Arc<AggregationState>,
    activity: Arc<ActivityFlag>,
    metrics: Arc<WorkerMetrics>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aggregation(&self) -> Arc<AggregationState> {
        Arc::clone(&self.inner.aggregation)
    }

    pub fn activity(&self) -> Arc<ActivityFlag> {
        Arc::clone(&self.inner.activity)
    }

    pub fn metrics(&self) -> Arc<WorkerMetrics> {
        Arc::clone(&self.inner.metrics)
    }
}
