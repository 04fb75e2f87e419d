//! Shared application state for the collector.

use std::sync::Arc;

use crate::storage::PointSink;

#[derive(Clone)]
pub struct AppState {
    sink: Arc<dyn PointSink>,
}

impl AppState {
    pub fn new(sink: Arc<dyn PointSink>) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> Arc<dyn PointSink> {
        Arc::clone(&self.sink)
    }
}
