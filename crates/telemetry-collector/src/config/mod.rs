//! Collector config loader: defaults, optional strict YAML file, then environment.

pub mod schema;

use std::fs;

use telemetry_core::error::{Result, TelemetryError};

pub use schema::{CollectorConfig, StorageConfig, StorageKind};

/// Env var naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "COLLECTOR_CONFIG";

pub fn load_from_file(path: &str) -> Result<CollectorConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TelemetryError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CollectorConfig> {
    let cfg: CollectorConfig = serde_yaml::from_str(s)
        .map_err(|e| TelemetryError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Process configuration as seen from the current environment.
pub fn load() -> Result<CollectorConfig> {
    let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_from_file(&path)?,
        Err(_) => CollectorConfig::default(),
    };
    cfg.apply_env(|k| std::env::var(k).ok())?;
    cfg.validate()?;
    Ok(cfg)
}
