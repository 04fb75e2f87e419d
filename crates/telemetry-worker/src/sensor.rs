//! Host resource sampling.
//!
//! The reporter only needs two percentages, so the sensor is a small trait;
//! [`SysinfoSensor`] backs it with `sysinfo` and tests substitute fixed values.

use sysinfo::System;

use telemetry_core::error::{Result, TelemetryError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceUsage {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

pub trait ResourceSensor: Send {
    fn sample(&mut self) -> Result<ResourceUsage>;
}

/// Global CPU and used-memory percentages of the host.
///
/// CPU usage is computed between consecutive refreshes, so the first sample
/// after construction reads close to zero.
pub struct SysinfoSensor {
    system: System,
}

impl Default for SysinfoSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSensor {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        Self { system }
    }
}

impl ResourceSensor for SysinfoSensor {
    fn sample(&mut self) -> Result<ResourceUsage> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(TelemetryError::TransientReport(
                "resource sampling unsupported on this platform".into(),
            ));
        }

        self.system.refresh_cpu();
        self.system.refresh_memory();

        let total = self.system.total_memory();
        if total == 0 {
            return Err(TelemetryError::TransientReport("total memory reported as zero".into()));
        }

        Ok(ResourceUsage {
            cpu_percent: self.system.global_cpu_info().cpu_usage() as f64,
            memory_percent: self.system.used_memory() as f64 / total as f64 * 100.0,
        })
    }
}
