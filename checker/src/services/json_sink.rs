//! Metrics sink writing one JSON object per emission

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use shared::{Gauge, ServiceCheck};
use crate::error::{CheckError, CheckResult};
use crate::traits::MetricsSink;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    ServiceCheck(&'a ServiceCheck),
    Gauge(&'a Gauge),
}

/// JSON lines sink over any writer
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_record(&self, record: &Record<'_>) -> CheckResult<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| CheckError::sink("JSON writer lock poisoned"))?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> MetricsSink for JsonLinesSink<W> {
    async fn service_check(&self, check: &ServiceCheck) -> CheckResult<()> {
        self.write_record(&Record::ServiceCheck(check))
    }

    async fn gauge(&self, gauge: &Gauge) -> CheckResult<()> {
        self.write_record(&Record::Gauge(gauge))
    }
}
