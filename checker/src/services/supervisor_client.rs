//! XML-RPC client for the supervisord control interface

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use shared::ProcessInfo;
use crate::config::{ConnectionConfig, Credentials};
use crate::error::{CheckError, CheckResult};
use crate::services::xmlrpc::{Value, decode_response, encode_call};
use crate::traits::{ProcessSupervisor, SupervisorConnector};

pub const GET_PROCESS_INFO: &str = "supervisor.getProcessInfo";

/// Real connector producing HTTP XML-RPC handles
#[derive(Debug, Clone, Default)]
pub struct RealSupervisorConnector;

impl RealSupervisorConnector {
    pub fn new() -> Self {
        Self
    }
}

impl SupervisorConnector for RealSupervisorConnector {
    fn connect(&self, config: &ConnectionConfig) -> CheckResult<Box<dyn ProcessSupervisor>> {
        Ok(Box::new(XmlRpcSupervisor::new(config.clone())?))
    }
}

/// Handle to one supervisord server, valid for a single check cycle
pub struct XmlRpcSupervisor {
    client: reqwest::Client,
    endpoint: String,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl XmlRpcSupervisor {
    pub fn new(config: ConnectionConfig) -> CheckResult<Self> {
        let endpoint = config.endpoint();
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CheckError::ConnectionError {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            credentials: config.credentials,
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one XML-RPC call and decode its result
    pub async fn call(&self, method: &str, params: &[Value]) -> CheckResult<Value> {
        debug!(endpoint = %self.endpoint, method, "XML-RPC call");

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml")
            .body(encode_call(method, params));
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.user, Some(&credentials.pass));
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::HttpStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        decode_response(&body)
    }

    fn transport_error(&self, error: reqwest::Error) -> CheckError {
        if error.is_timeout() {
            CheckError::Timeout {
                endpoint: self.endpoint.clone(),
                timeout: self.timeout,
            }
        } else {
            CheckError::ConnectionError {
                endpoint: self.endpoint.clone(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ProcessSupervisor for XmlRpcSupervisor {
    async fn get_process_info(&self, proc_name: &str) -> CheckResult<ProcessInfo> {
        let value = self.call(GET_PROCESS_INFO, &[Value::from(proc_name)]).await?;
        process_info_from_value(&value)
    }
}

/// Map a `getProcessInfo` struct onto [`ProcessInfo`]
pub fn process_info_from_value(value: &Value) -> CheckResult<ProcessInfo> {
    let members = value
        .as_struct()
        .ok_or_else(|| CheckError::protocol("process info is not a struct"))?;

    Ok(ProcessInfo {
        name: required_str(members, "name")?,
        group: required_str(members, "group")?,
        statename: required_str(members, "statename")?,
        description: optional_str(members, "description")?,
        stderr_logfile: optional_str(members, "stderr_logfile")?,
        stdout_logfile: optional_str(members, "stdout_logfile")?,
        logfile: optional_str(members, "logfile")?,
        start: required_int(members, "start")?,
        stop: required_int(members, "stop")?,
        now: required_int(members, "now")?,
        exitstatus: match members.get("exitstatus") {
            None | Some(Value::Nil) => None,
            Some(Value::Int(n)) => Some(*n),
            Some(_) => return Err(CheckError::protocol("field 'exitstatus' is not an integer")),
        },
    })
}

fn required_str(members: &BTreeMap<String, Value>, field: &str) -> CheckResult<String> {
    match members.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CheckError::protocol(format!("field '{field}' is not a string"))),
        None => Err(CheckError::protocol(format!("missing field '{field}'"))),
    }
}

fn optional_str(members: &BTreeMap<String, Value>, field: &str) -> CheckResult<String> {
    match members.get(field) {
        None | Some(Value::Nil) => Ok(String::new()),
        Some(_) => required_str(members, field),
    }
}

fn required_int(members: &BTreeMap<String, Value>, field: &str) -> CheckResult<i64> {
    match members.get(field) {
        Some(Value::Int(n)) => Ok(*n),
        Some(_) => Err(CheckError::protocol(format!("field '{field}' is not an integer"))),
        None => Err(CheckError::protocol(format!("missing field '{field}'"))),
    }
}
