//! Trait definitions for dependency injection
//!
//! The check runner only knows these seams: a connector that opens a
//! short-lived handle to one supervisord server, the handle itself, and the
//! sink that receives service checks and gauges. Each trait carries a
//! mockall mock for tests.

use async_trait::async_trait;

use shared::{Gauge, ProcessInfo, ServiceCheck};
use crate::config::ConnectionConfig;
use crate::error::CheckResult;

/// Opens a handle to a supervisord control interface
#[mockall::automock]
pub trait SupervisorConnector: Send + Sync {
    /// Build a handle for one check cycle
    fn connect(&self, config: &ConnectionConfig) -> CheckResult<Box<dyn ProcessSupervisor>>;
}

/// Remote supervisord server handle
#[mockall::automock]
#[async_trait]
pub trait ProcessSupervisor: Send + Sync {
    /// Fetch the current info record for a named process
    async fn get_process_info(&self, proc_name: &str) -> CheckResult<ProcessInfo>;
}

/// Destination for emitted service checks and gauges
#[mockall::automock]
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Emit a service check
    async fn service_check(&self, check: &ServiceCheck) -> CheckResult<()>;

    /// Emit a gauge
    async fn gauge(&self, gauge: &Gauge) -> CheckResult<()>;
}

/// Lets the binary pick a sink at runtime
#[async_trait]
impl<T: MetricsSink + ?Sized> MetricsSink for Box<T> {
    async fn service_check(&self, check: &ServiceCheck) -> CheckResult<()> {
        (**self).service_check(check).await
    }

    async fn gauge(&self, gauge: &Gauge) -> CheckResult<()> {
        (**self).gauge(gauge).await
    }
}
