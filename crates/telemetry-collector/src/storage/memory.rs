use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use telemetry_core::error::{Result, TelemetryError};
use telemetry_core::Point;

use super::PointSink;

/// Ordered in-process store. Used for local runs and tests.
#[derive(Default)]
pub struct MemorySink {
    points: Mutex<Vec<Point>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far, in write order.
    pub fn points(&self) -> Vec<Point> {
        self.points.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.points.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PointSink for MemorySink {
    async fn write_point(&self, point: &Point) -> Result<()> {
        // Poisoned mutex means a writer panicked; surface it as a failed write.
        let mut g = self
            .points
            .lock()
            .map_err(|_| TelemetryError::UpstreamWrite("memory sink poisoned".into()))?;
        g.push(point.clone());
        Ok(())
    }
}
