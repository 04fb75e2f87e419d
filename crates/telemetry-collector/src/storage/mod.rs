//! Storage backends for ingested points.

pub mod influx;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use telemetry_core::error::Result;
use telemetry_core::Point;

use crate::config::{StorageConfig, StorageKind};

pub use influx::InfluxSink;
pub use memory::MemorySink;

/// A time-series store accepting one point per call.
#[async_trait]
pub trait PointSink: Send + Sync {
    async fn write_point(&self, point: &Point) -> Result<()>;
}

/// Build the sink selected by `cfg.kind`.
pub fn from_config(cfg: &StorageConfig) -> Result<Arc<dyn PointSink>> {
    let sink: Arc<dyn PointSink> = match cfg.kind {
        StorageKind::Influx => Arc::new(InfluxSink::new(cfg)?),
        StorageKind::Memory => Arc::new(MemorySink::new()),
    };
    Ok(sink)
}
