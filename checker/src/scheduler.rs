//! Interval harness around the check runner
//!
//! Runs every configured instance once per tick. A failed instance is
//! logged, reported through the `supervisord.check.run` service check, and
//! simply retried on the next tick.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use shared::logging::{log_error, log_shutdown, log_success};
use shared::metric_names::CHECK_RUN;
use shared::{HealthLevel, ServiceCheck, check_warn};

use crate::check_impl::SupervisordCheck;
use crate::config::InstanceConfig;
use crate::core::server_tags;
use crate::error::CheckResult;
use crate::traits::{MetricsSink, SupervisorConnector};
use crate::types::AggregateCounts;

/// Result of one instance in one cycle
#[derive(Debug)]
pub struct CycleOutcome {
    pub instance: String,
    pub result: CheckResult<AggregateCounts>,
}

pub struct Scheduler<C, M>
where
    C: SupervisorConnector,
    M: MetricsSink,
{
    check: SupervisordCheck<C, M>,
    instances: Vec<InstanceConfig>,
    interval: Duration,
}

impl<C, M> Scheduler<C, M>
where
    C: SupervisorConnector,
    M: MetricsSink,
{
    pub fn new(check: SupervisordCheck<C, M>, instances: Vec<InstanceConfig>, interval: Duration) -> Self {
        for instance in &instances {
            if instance.has_partial_credentials() {
                check_warn!(
                    instance.name,
                    "Only one of user/pass is set; connecting without authentication"
                );
            }
        }

        Self {
            check,
            instances,
            interval,
        }
    }

    pub fn instances(&self) -> &[InstanceConfig] {
        &self.instances
    }

    /// Run every instance once, in configuration order
    pub async fn run_cycle(&self) -> Vec<CycleOutcome> {
        let mut outcomes = Vec::with_capacity(self.instances.len());

        for instance in &self.instances {
            let result = self.check.run(instance).await;

            let meta = match &result {
                Ok(counts) => {
                    log_success(
                        &instance.name,
                        &format!(
                            "{} processes: {} up, {} down, {} unknown",
                            counts.total, counts.healthy, counts.critical, counts.indeterminate
                        ),
                    );
                    ServiceCheck::new(CHECK_RUN, HealthLevel::Healthy, server_tags(&instance.name), String::new())
                }
                Err(e) => {
                    log_error(&instance.name, "Check cycle", e);
                    ServiceCheck::new(CHECK_RUN, HealthLevel::Critical, server_tags(&instance.name), e.to_string())
                }
            };

            if let Err(e) = self.check.sink().service_check(&meta).await {
                log_error(&instance.name, "Reporting check run status", &e);
            }

            outcomes.push(CycleOutcome {
                instance: instance.name.clone(),
                result,
            });
        }

        outcomes
    }

    /// Run a cycle on every tick until `shutdown` resolves
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log_shutdown("shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }
}
