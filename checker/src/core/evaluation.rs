//! Turns one fetched process record into a per-process check result

use shared::ProcessInfo;

use crate::core::classifier::classify_process;
use crate::core::message::build_message;
use crate::core::uptime::uptime;
use crate::error::CheckResult;
use crate::types::ProcessCheck;

/// Tags shared by every metric of a server instance
pub fn server_tags(server: &str) -> Vec<String> {
    vec!["supervisord".to_string(), format!("server:{server}")]
}

/// Tags for the metrics of one process
pub fn process_tags(server: &str, proc_name: &str) -> Vec<String> {
    let mut tags = server_tags(server);
    tags.push(format!("process:{proc_name}"));
    tags
}

/// Classify, time and describe one process record
pub fn evaluate(server: &str, proc_name: &str, info: &ProcessInfo) -> CheckResult<ProcessCheck> {
    let health = classify_process(proc_name, &info.statename)?;

    Ok(ProcessCheck {
        proc_name: proc_name.to_string(),
        tags: process_tags(server, proc_name),
        health,
        message: build_message(info),
        uptime_seconds: uptime(info.start, info.stop, info.now),
    })
}
