//! Check runner with dependency injection

use shared::metric_names::{
    PROCESS_CHECK, PROCESS_DOWN, PROCESS_TOTAL, PROCESS_UNKNOWN, PROCESS_UP, PROCESS_UPTIME,
};
use shared::{Gauge, HealthLevel, ServiceCheck, check_debug};

use crate::config::InstanceConfig;
use crate::core::{evaluate, server_tags};
use crate::error::CheckResult;
use crate::traits::{MetricsSink, SupervisorConnector};
use crate::types::{AggregateCounts, ProcessCheck};

/// One-cycle supervisord check over injected connector and sink
pub struct SupervisordCheck<C, M>
where
    C: SupervisorConnector,
    M: MetricsSink,
{
    connector: C,
    sink: M,
}

impl<C, M> SupervisordCheck<C, M>
where
    C: SupervisorConnector,
    M: MetricsSink,
{
    pub fn new(connector: C, sink: M) -> Self {
        Self { connector, sink }
    }

    pub fn sink(&self) -> &M {
        &self.sink
    }

    pub fn into_sink(self) -> M {
        self.sink
    }

    /// Run one cycle for an instance.
    ///
    /// Every configured process is fetched and classified before anything is
    /// emitted, so an error leaves the sink untouched for this instance.
    pub async fn run(&self, instance: &InstanceConfig) -> CheckResult<AggregateCounts> {
        let results = self.collect(instance).await?;

        let mut counts = AggregateCounts::new();
        counts.total = instance.proc_names.len();
        for result in &results {
            counts.record(result.health);
        }

        self.emit(&instance.name, &results, &counts).await?;
        Ok(counts)
    }

    /// Fetch and evaluate every configured process over one connection
    pub async fn collect(&self, instance: &InstanceConfig) -> CheckResult<Vec<ProcessCheck>> {
        let supervisor = self.connector.connect(&instance.connection())?;

        let mut results = Vec::with_capacity(instance.proc_names.len());
        for proc_name in &instance.proc_names {
            let info = supervisor.get_process_info(proc_name).await?;
            let result = evaluate(&instance.name, proc_name, &info)?;
            check_debug!(
                instance.name,
                process = %proc_name,
                state = %info.statename,
                health = %result.health,
                "evaluated process"
            );
            results.push(result);
        }
        Ok(results)
    }

    async fn emit(
        &self,
        server: &str,
        results: &[ProcessCheck],
        counts: &AggregateCounts,
    ) -> CheckResult<()> {
        for result in results {
            self.sink
                .service_check(&ServiceCheck::new(
                    PROCESS_CHECK,
                    result.health,
                    result.tags.clone(),
                    result.message.clone(),
                ))
                .await?;
            self.sink
                .gauge(&Gauge::new(
                    PROCESS_UPTIME,
                    result.uptime_seconds as f64,
                    result.tags.clone(),
                ))
                .await?;
        }

        let tags = server_tags(server);
        let aggregates = [
            (PROCESS_TOTAL, counts.total),
            (PROCESS_UP, counts.count(HealthLevel::Healthy)),
            (PROCESS_DOWN, counts.count(HealthLevel::Critical)),
            (PROCESS_UNKNOWN, counts.count(HealthLevel::Indeterminate)),
        ];
        for (name, value) in aggregates {
            self.sink
                .gauge(&Gauge::new(name, value as f64, tags.clone()))
                .await?;
        }
        Ok(())
    }
}
