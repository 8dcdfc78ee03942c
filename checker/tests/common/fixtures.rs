//! Test fixtures and data for check tests

use shared::ProcessInfo;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const SERVER: &'static str = "web";
    pub const START: i64 = 1_700_000_000;
    pub const NOW: i64 = 1_700_000_500;

    /// Process record with the given state, started at START and observed at NOW
    pub fn process_info(name: &str, statename: &str) -> ProcessInfo {
        let stopped = !matches!(statename, "RUNNING" | "STARTING" | "BACKOFF");
        ProcessInfo {
            name: name.to_string(),
            group: name.to_string(),
            statename: statename.to_string(),
            description: format!("{name} is {statename}"),
            stderr_logfile: format!("/var/log/{name}.err"),
            stdout_logfile: format!("/var/log/{name}.out"),
            logfile: format!("/var/log/{name}.out"),
            start: Self::START,
            stop: if stopped { Self::START + 100 } else { 0 },
            now: Self::NOW,
            exitstatus: Some(if statename == "FATAL" { 1 } else { 0 }),
        }
    }

    /// Mixed fleet: one healthy, one critical, one indeterminate
    pub fn mixed_fleet() -> Vec<ProcessInfo> {
        vec![
            Self::process_info("api", "RUNNING"),
            Self::process_info("worker", "FATAL"),
            Self::process_info("cron", "BACKOFF"),
        ]
    }

    /// Supervisord `getProcessInfo` XML-RPC response for a record
    pub fn process_info_xml(info: &ProcessInfo) -> String {
        format!(
            r#"<?xml version='1.0'?>
<methodResponse>
<params>
<param>
<value><struct>
<member><name>name</name><value><string>{name}</string></value></member>
<member><name>group</name><value><string>{group}</string></value></member>
<member><name>statename</name><value><string>{statename}</string></value></member>
<member><name>description</name><value><string>{description}</string></value></member>
<member><name>stderr_logfile</name><value><string>{stderr}</string></value></member>
<member><name>stdout_logfile</name><value><string>{stdout}</string></value></member>
<member><name>logfile</name><value><string>{logfile}</string></value></member>
<member><name>start</name><value><int>{start}</int></value></member>
<member><name>stop</name><value><int>{stop}</int></value></member>
<member><name>now</name><value><int>{now}</int></value></member>
<member><name>exitstatus</name><value><int>{exitstatus}</int></value></member>
</struct></value>
</param>
</params>
</methodResponse>
"#,
            name = info.name,
            group = info.group,
            statename = info.statename,
            description = info.description,
            stderr = info.stderr_logfile,
            stdout = info.stdout_logfile,
            logfile = info.logfile,
            start = info.start,
            stop = info.stop,
            now = info.now,
            exitstatus = info.exitstatus.unwrap_or_default(),
        )
    }

    /// Supervisord fault response
    pub fn fault_xml(code: i64, message: &str) -> String {
        format!(
            r#"<?xml version='1.0'?>
<methodResponse>
<fault>
<value><struct>
<member><name>faultCode</name><value><int>{code}</int></value></member>
<member><name>faultString</name><value><string>{message}</string></value></member>
</struct></value>
</fault>
</methodResponse>
"#
        )
    }
}
