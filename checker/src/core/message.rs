//! Human-readable diagnostic attached to each process service check

use chrono::{Local, TimeZone};
use shared::ProcessInfo;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format epoch seconds in local time, falling back to the raw number when out of range
pub fn format_epoch(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).earliest() {
        Some(time) => time.format(TIME_FORMAT).to_string(),
        None => secs.to_string(),
    }
}

/// Build the multi-line service check message for a process record
pub fn build_message(info: &ProcessInfo) -> String {
    let stop = if info.stop == 0 {
        String::new()
    } else {
        format_epoch(info.stop)
    };
    let exit_status = info
        .exitstatus
        .map(|status| status.to_string())
        .unwrap_or_default();

    format!(
        "Current time: {now}\n\
         Process name: {name}\n\
         Process group: {group}\n\
         Description: {description}\n\
         Error log file: {stderr}\n\
         Stdout log file: {stdout}\n\
         Log file: {logfile}\n\
         State: {state}\n\
         Start time: {start}\n\
         Stop time: {stop}\n\
         Exit Status: {exit_status}",
        now = format_epoch(info.now),
        name = info.name,
        group = info.group,
        description = info.description,
        stderr = info.stderr_logfile,
        stdout = info.stdout_logfile,
        logfile = info.logfile,
        state = info.statename,
        start = format_epoch(info.start),
        stop = stop,
        exit_status = exit_status,
    )
}
