//! Test helpers and builder patterns for check tests
//!
//! Provides a recording sink that keeps every emission in order, and a
//! builder that wires a mock supervisord fleet into a `SupervisordCheck`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use shared::{Gauge, ProcessInfo, ServiceCheck};
use supervisord_check::*;

/// One emission as seen by the sink
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    ServiceCheck(ServiceCheck),
    Gauge(Gauge),
}

/// Sink that records emissions in order; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    emissions: Arc<Mutex<Vec<Emission>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.emissions.lock().unwrap().clear();
    }

    pub fn service_checks(&self) -> Vec<ServiceCheck> {
        self.emissions()
            .into_iter()
            .filter_map(|e| match e {
                Emission::ServiceCheck(check) => Some(check),
                Emission::Gauge(_) => None,
            })
            .collect()
    }

    pub fn gauges(&self) -> Vec<Gauge> {
        self.emissions()
            .into_iter()
            .filter_map(|e| match e {
                Emission::Gauge(gauge) => Some(gauge),
                Emission::ServiceCheck(_) => None,
            })
            .collect()
    }

    /// Value of the first gauge with this name
    pub fn gauge_value(&self, name: &str) -> Option<f64> {
        self.gauges()
            .into_iter()
            .find(|g| g.name == name)
            .map(|g| g.value)
    }

    /// Metric names in emission order, service checks prefixed with `sc:`
    pub fn names(&self) -> Vec<String> {
        self.emissions()
            .into_iter()
            .map(|e| match e {
                Emission::ServiceCheck(check) => format!("sc:{}", check.name),
                Emission::Gauge(gauge) => gauge.name,
            })
            .collect()
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn service_check(&self, check: &ServiceCheck) -> CheckResult<()> {
        self.emissions
            .lock()
            .unwrap()
            .push(Emission::ServiceCheck(check.clone()));
        Ok(())
    }

    async fn gauge(&self, gauge: &Gauge) -> CheckResult<()> {
        self.emissions.lock().unwrap().push(Emission::Gauge(gauge.clone()));
        Ok(())
    }
}

/// Canned answer from the mock supervisor for one process name
#[derive(Debug, Clone)]
pub enum Remote {
    Info(ProcessInfo),
    Fault { code: i64, message: String },
}

/// Builder for checks backed by a mock supervisord fleet
pub struct CheckBuilder {
    servers: HashMap<String, HashMap<String, Remote>>,
    unreachable: Vec<String>,
}

impl CheckBuilder {
    pub fn new() -> Self {
        Self {
            servers: HashMap::new(),
            unreachable: Vec::new(),
        }
    }

    /// Register a process record on the server at `host`
    pub fn with_process(mut self, host: &str, info: ProcessInfo) -> Self {
        self.servers
            .entry(host.to_string())
            .or_default()
            .insert(info.name.clone(), Remote::Info(info));
        self
    }

    /// Make `proc_name` on `host` answer with an XML-RPC fault
    pub fn with_fault(mut self, host: &str, proc_name: &str, code: i64, message: &str) -> Self {
        self.servers.entry(host.to_string()).or_default().insert(
            proc_name.to_string(),
            Remote::Fault {
                code,
                message: message.to_string(),
            },
        );
        self
    }

    /// Make connecting to `host` fail
    pub fn with_unreachable(mut self, host: &str) -> Self {
        self.unreachable.push(host.to_string());
        self
    }

    pub fn build_connector(self) -> MockSupervisorConnector {
        let servers = self.servers;
        let unreachable = self.unreachable;

        let mut connector = MockSupervisorConnector::new();
        connector
            .expect_connect()
            .returning(move |config: &ConnectionConfig| {
                if unreachable.contains(&config.host) {
                    return Err(CheckError::ConnectionError {
                        endpoint: config.endpoint(),
                        message: "connection refused".to_string(),
                    });
                }

                let records = servers.get(&config.host).cloned().unwrap_or_default();
                let mut supervisor = MockProcessSupervisor::new();
                supervisor
                    .expect_get_process_info()
                    .returning(move |proc_name: &str| match records.get(proc_name) {
                        Some(Remote::Info(info)) => Ok(info.clone()),
                        Some(Remote::Fault { code, message }) => Err(CheckError::RemoteFault {
                            code: *code,
                            message: message.clone(),
                        }),
                        None => Err(CheckError::RemoteFault {
                            code: 10,
                            message: format!("BAD_NAME: {proc_name}"),
                        }),
                    });
                Ok(Box::new(supervisor) as Box<dyn ProcessSupervisor>)
            })
            .times(0..);
        connector
    }

    /// Build a check and return it with a handle to its recorded emissions
    pub fn build(self) -> (SupervisordCheck<MockSupervisorConnector, RecordingSink>, RecordingSink) {
        let sink = RecordingSink::new();
        let check = SupervisordCheck::new(self.build_connector(), sink.clone());
        (check, sink)
    }
}

/// Common test helper functions
pub struct TestHelpers;

impl TestHelpers {
    /// Instance pointed at `host` with the given processes
    pub fn instance(name: &str, host: &str, proc_names: &[&str]) -> InstanceConfig {
        let mut instance = InstanceConfig::new(name).with_proc_names(proc_names.iter().copied());
        instance.host = host.to_string();
        instance
    }

    /// Tags carried by every metric of a server
    pub fn server_tags(server: &str) -> Vec<String> {
        vec!["supervisord".to_string(), format!("server:{server}")]
    }

    /// Tags carried by per-process metrics
    pub fn process_tags(server: &str, proc_name: &str) -> Vec<String> {
        let mut tags = Self::server_tags(server);
        tags.push(format!("process:{proc_name}"));
        tags
    }
}
