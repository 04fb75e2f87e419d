use serde::Deserialize;
use telemetry_core::error::{Result, TelemetryError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            storage: StorageConfig::default(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Influx,
    Memory,
}

/// Connection settings for the time-series store.
///
/// All strings may be empty: a misconfigured store shows up as write failures
/// (500s) rather than a refusal to start.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub bucket: String,
    /// Per-write request timeout.
    #[serde(default = "default_storage_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::default(),
            url: String::new(),
            token: String::new(),
            org: String::new(),
            bucket: String::new(),
            timeout_ms: default_storage_timeout_ms(),
        }
    }
}

impl CollectorConfig {
    /// Overlay environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LISTEN_ADDR") {
            self.listen = v;
        }
        if let Some(v) = lookup("STORAGE_KIND") {
            self.storage.kind = match v.to_ascii_lowercase().as_str() {
                "influx" => StorageKind::Influx,
                "memory" => StorageKind::Memory,
                other => {
                    return Err(TelemetryError::Config(format!("unknown STORAGE_KIND: {other}")))
                }
            };
        }
        if let Some(v) = lookup("INFLUXDB_URL") {
            self.storage.url = v;
        }
        if let Some(v) = lookup("INFLUXDB_TOKEN") {
            self.storage.token = v;
        }
        if let Some(v) = lookup("INFLUXDB_ORG") {
            self.storage.org = v;
        }
        if let Some(v) = lookup("INFLUXDB_BUCKET") {
            self.storage.bucket = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.listen.is_empty() {
            return Err(TelemetryError::Config("listen must not be empty".into()));
        }
        if self.storage.timeout_ms == 0 {
            return Err(TelemetryError::Config("storage.timeout_ms must be non-zero".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}
fn default_storage_timeout_ms() -> u64 {
    20000
}
