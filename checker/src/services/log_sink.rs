//! Metrics sink that reports emissions as structured tracing events

use async_trait::async_trait;
use tracing::info;

use shared::{Gauge, ServiceCheck};
use crate::error::CheckResult;
use crate::traits::MetricsSink;

#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetricsSink for LogSink {
    async fn service_check(&self, check: &ServiceCheck) -> CheckResult<()> {
        info!(
            metric = %check.name,
            status = %check.status,
            tags = %check.tags.join(","),
            message = %check.message,
            "service check"
        );
        Ok(())
    }

    async fn gauge(&self, gauge: &Gauge) -> CheckResult<()> {
        info!(
            metric = %gauge.name,
            value = gauge.value,
            tags = %gauge.tags.join(","),
            "gauge"
        );
        Ok(())
    }
}
