//! Maps supervisord state names onto service check health levels

use shared::{HealthLevel, ProcessState};

use crate::error::{CheckError, CheckResult};

/// Health level for a known process state
pub fn health_for(state: ProcessState) -> HealthLevel {
    match state {
        ProcessState::Starting | ProcessState::Running => HealthLevel::Healthy,
        ProcessState::Stopped
        | ProcessState::Stopping
        | ProcessState::Exited
        | ProcessState::Fatal => HealthLevel::Critical,
        ProcessState::Backoff | ProcessState::Unknown => HealthLevel::Indeterminate,
    }
}

/// Classify a raw state name; names outside the fixed set are an error, never a default
pub fn classify(statename: &str) -> CheckResult<HealthLevel> {
    let state: ProcessState = statename.parse()?;
    Ok(health_for(state))
}

/// Classify the state of a named process, keeping the process name in the error
pub fn classify_process(proc_name: &str, statename: &str) -> CheckResult<HealthLevel> {
    classify(statename).map_err(|_| CheckError::Classification {
        process: proc_name.to_string(),
        statename: statename.to_string(),
    })
}
