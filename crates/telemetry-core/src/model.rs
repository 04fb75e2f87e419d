//! Metrics Summary wire model and the time-series points derived from it.
//!
//! Wire shape (JSON):
//! `{"service_name": "...", "timestamp": "<RFC3339>", "metrics": {"name": 1.0}}`
//!
//! Unknown fields are ignored and missing fields decode to their empty form, so
//! presence checks are done by [`MetricsSummary::validate`] rather than serde.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemetryError};

/// Completed task count since process start.
pub const PROCESSED_TASKS: &str = "processed_tasks";
/// Mean task duration in seconds.
pub const AVG_PROCESSING_TIME_S: &str = "avg_processing_time_s";
/// Host CPU utilisation percentage.
pub const CPU_USAGE_PERCENT: &str = "cpu_usage_percent";
/// Host memory utilisation percentage.
pub const MEMORY_USAGE_PERCENT: &str = "memory_usage_percent";

/// Unix seconds of `0001-01-01T00:00:00Z`, the "unset" instant.
const ZERO_INSTANT_SECS: i64 = -62_135_596_800;

const MISSING_FIELDS: &str = "Missing required fields";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(default)]
    pub service_name: String,

    #[serde(default, with = "rfc3339_opt")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl MetricsSummary {
    pub fn new(service_name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            service_name: service_name.into(),
            timestamp: Some(timestamp),
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Presence checks only: service name, timestamp and at least one metric.
    pub fn validate(&self) -> Result<()> {
        let ts_ok = self.timestamp.map(|ts| !is_zero_instant(&ts)).unwrap_or(false);
        if self.service_name.is_empty() || !ts_ok || self.metrics.is_empty() {
            return Err(TelemetryError::Validation(MISSING_FIELDS.into()));
        }
        Ok(())
    }

    /// Validate and expand into one point per metric, all sharing the
    /// service tag and the summary timestamp.
    pub fn into_points(self) -> Result<Vec<Point>> {
        self.validate()?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| TelemetryError::Validation(MISSING_FIELDS.into()))?;

        let service = self.service_name;
        Ok(self
            .metrics
            .into_iter()
            .map(|(measurement, value)| Point {
                measurement,
                service: service.clone(),
                value,
                timestamp,
            })
            .collect())
    }
}

fn is_zero_instant(ts: &DateTime<Utc>) -> bool {
    ts.timestamp() == ZERO_INSTANT_SECS && ts.timestamp_subsec_nanos() == 0
}

/// A single (metric, service tag, timestamp, value) record.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub service: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// RFC3339 with second precision on the way out; any RFC3339 offset on the way in.
mod rfc3339_opt {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(ts) => s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(D::Error::custom)
        })
        .transpose()
    }
}
