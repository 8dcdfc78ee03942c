//! Core shared types for supervised processes and emitted metrics

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SharedError;

/// Metric and service check names emitted by the check
pub mod metric_names {
    pub const PROCESS_CHECK: &str = "supervisord.process.check";
    pub const PROCESS_UPTIME: &str = "supervisord.process.uptime";
    pub const PROCESS_TOTAL: &str = "supervisord.process.total";
    pub const PROCESS_UP: &str = "supervisord.process.up";
    pub const PROCESS_DOWN: &str = "supervisord.process.down";
    pub const PROCESS_UNKNOWN: &str = "supervisord.process.unknown";
    pub const CHECK_RUN: &str = "supervisord.check.run";
}

/// State names reported by supervisord for a supervised process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessState {
    Stopped,
    Starting,
    Running,
    Backoff,
    Stopping,
    Exited,
    Fatal,
    Unknown,
}

impl ProcessState {
    pub const ALL: [ProcessState; 8] = [
        ProcessState::Stopped,
        ProcessState::Starting,
        ProcessState::Running,
        ProcessState::Backoff,
        ProcessState::Stopping,
        ProcessState::Exited,
        ProcessState::Fatal,
        ProcessState::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Stopped => "STOPPED",
            ProcessState::Starting => "STARTING",
            ProcessState::Running => "RUNNING",
            ProcessState::Backoff => "BACKOFF",
            ProcessState::Stopping => "STOPPING",
            ProcessState::Exited => "EXITED",
            ProcessState::Fatal => "FATAL",
            ProcessState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProcessState {
    type Err = SharedError;

    /// Exact match on the upper-case names supervisord sends
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STOPPED" => Ok(ProcessState::Stopped),
            "STARTING" => Ok(ProcessState::Starting),
            "RUNNING" => Ok(ProcessState::Running),
            "BACKOFF" => Ok(ProcessState::Backoff),
            "STOPPING" => Ok(ProcessState::Stopping),
            "EXITED" => Ok(ProcessState::Exited),
            "FATAL" => Ok(ProcessState::Fatal),
            "UNKNOWN" => Ok(ProcessState::Unknown),
            _ => Err(SharedError::UnknownProcessState {
                statename: s.to_string(),
            }),
        }
    }
}

/// Health verdict attached to a service check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Healthy,
    Critical,
    Indeterminate,
}

impl HealthLevel {
    /// Numeric service check status (OK = 0, CRITICAL = 2, UNKNOWN = 3)
    pub fn status_code(&self) -> u8 {
        match self {
            HealthLevel::Healthy => 0,
            HealthLevel::Critical => 2,
            HealthLevel::Indeterminate => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLevel::Healthy => "ok",
            HealthLevel::Critical => "critical",
            HealthLevel::Indeterminate => "unknown",
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one supervised process as returned by `supervisor.getProcessInfo`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub name: String,
    pub group: String,
    pub statename: String,
    pub description: String,
    pub stderr_logfile: String,
    pub stdout_logfile: String,
    pub logfile: String,
    pub start: i64,
    /// Zero while the process has not stopped since its last start
    pub stop: i64,
    pub now: i64,
    pub exitstatus: Option<i64>,
}

/// A discrete health verdict for the metrics sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCheck {
    pub name: String,
    pub status: HealthLevel,
    pub tags: Vec<String>,
    pub message: String,
}

impl ServiceCheck {
    pub fn new(name: &str, status: HealthLevel, tags: Vec<String>, message: String) -> Self {
        Self {
            name: name.to_string(),
            status,
            tags,
            message,
        }
    }
}

/// A point-in-time numeric metric for the metrics sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub name: String,
    pub value: f64,
    pub tags: Vec<String>,
}

impl Gauge {
    pub fn new(name: &str, value: f64, tags: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            value,
            tags,
        }
    }
}
