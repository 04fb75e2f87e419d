use serde::Deserialize;
use telemetry_core::error::{Result, TelemetryError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Collector ingestion URL. Empty is tolerated; cycles then fail and log.
    #[serde(default)]
    pub api_url: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_task_iterations")]
    pub task_iterations: u64,

    #[serde(default = "default_idle_sleep_ms")]
    pub idle_sleep_ms: u64,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            api_url: String::new(),
            service_name: default_service_name(),
            workers: default_workers(),
            report_interval_ms: default_report_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            task_iterations: default_task_iterations(),
            idle_sleep_ms: default_idle_sleep_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl WorkerConfig {
    /// Overlay environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LISTEN_ADDR") {
            self.listen = v;
        }
        if let Some(v) = lookup("API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("SERVICE_NAME") {
            self.service_name = v;
        }
        if let Some(v) = lookup("WORKER_COUNT") {
            self.workers = v
                .parse()
                .map_err(|e| TelemetryError::Config(format!("WORKER_COUNT={v}: {e}")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(TelemetryError::Config("workers must be at least 1".into()));
        }
        if self.report_interval_ms == 0 {
            return Err(TelemetryError::Config("report_interval_ms must be non-zero".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(TelemetryError::Config("request_timeout_ms must be non-zero".into()));
        }
        if self.service_name.is_empty() {
            return Err(TelemetryError::Config("service_name must not be empty".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_service_name() -> String {
    "worker".into()
}
fn default_workers() -> usize {
    5
}
fn default_report_interval_ms() -> u64 {
    5000
}
fn default_request_timeout_ms() -> u64 {
    10000
}
fn default_task_iterations() -> u64 {
    50_000_000
}
fn default_idle_sleep_ms() -> u64 {
    10
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}
