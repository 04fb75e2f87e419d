//! Aggregator/Reporter: periodic summary of the shared counters pushed to the collector.
//!
//! One cycle reads the counters, samples the host, builds a Metrics Summary and
//! POSTs it. Every failure is logged and the cycle skipped; counters are
//! cumulative, so the next successful summary covers what a lost one missed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use telemetry_core::error::{Result, TelemetryError};
use telemetry_core::model::{
    MetricsSummary, AVG_PROCESSING_TIME_S, CPU_USAGE_PERCENT, MEMORY_USAGE_PERCENT, PROCESSED_TASKS,
};
use telemetry_server::Shutdown;

use crate::sensor::ResourceSensor;
use crate::workload::AggregationState;

pub struct Reporter {
    state: Arc<AggregationState>,
    sensor: Box<dyn ResourceSensor>,
    client: reqwest::Client,
    endpoint: String,
    service_name: String,
}

impl Reporter {
    pub fn new(
        state: Arc<AggregationState>,
        sensor: Box<dyn ResourceSensor>,
        endpoint: impl Into<String>,
        service_name: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TelemetryError::Startup(format!("http client: {e}")))?;

        Ok(Self {
            state,
            sensor,
            client,
            endpoint: endpoint.into(),
            service_name: service_name.into(),
        })
    }

    /// Read counters and sample the host into a summary stamped `now`.
    pub fn build_summary(&mut self, now: DateTime<Utc>) -> Result<MetricsSummary> {
        let snap = self.state.snapshot();
        let usage = self.sensor.sample()?;

        Ok(MetricsSummary::new(self.service_name.clone(), now)
            .with_metric(PROCESSED_TASKS, snap.completed as f64)
            .with_metric(AVG_PROCESSING_TIME_S, snap.average_seconds())
            .with_metric(CPU_USAGE_PERCENT, usage.cpu_percent)
            .with_metric(MEMORY_USAGE_PERCENT, usage.memory_percent))
    }

    /// One aggregation cycle. Returns the delivered summary.
    pub async fn collect_and_send(&mut self) -> Result<MetricsSummary> {
        let summary = self.build_summary(Utc::now())?;

        let body = serde_json::to_string(&summary)
            .map_err(|e| TelemetryError::TransientReport(format!("encode summary: {e}")))?;

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body.clone())
            .send()
            .await
            .map_err(|e| TelemetryError::TransientReport(format!("send to collector: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TelemetryError::TransientReport(format!(
                "collector responded {status}"
            )));
        }

        tracing::info!(%body, "stats sent");
        Ok(summary)
    }

    /// Run cycles every `period` until `shutdown`.
    ///
    /// Cycles run sequentially on this task, so at most one is in flight. Ticks
    /// that come due while a cycle is still running are dropped.
    pub async fn run(mut self, period: Duration, shutdown: Shutdown) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(endpoint = %self.endpoint, period_ms = period.as_millis() as u64, "reporter started");

        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = shutdown.wait() => break,
                res = self.collect_and_send() => {
                    if let Err(e) = res {
                        tracing::warn!(code = e.client_code().as_str(), error = %e, "report cycle skipped");
                    }
                }
            }
        }

        tracing::info!("reporter stopped");
    }
}
