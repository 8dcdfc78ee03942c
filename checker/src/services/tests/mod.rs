//! Tests for check services
//!
//! Cover the XML-RPC codec, the HTTP supervisor client against a mock
//! supervisord endpoint, and the concrete metrics sinks.


/// A `getProcessInfo` response as supervisord renders it
pub fn process_info_response(name: &str, statename: &str, start: i64, stop: i64, now: i64) -> String {
    format!(
        r#"<?xml version='1.0'?>
<methodResponse>
<params>
<param>
<value><struct>
<member>
<name>name</name>
<value><string>{name}</string></value>
</member>
<member>
<name>group</name>
<value><string>{name}</string></value>
</member>
<member>
<name>statename</name>
<value><string>{statename}</string></value>
</member>
<member>
<name>state</name>
<value><int>20</int></value>
</member>
<member>
<name>description</name>
<value><string>pid 4242, uptime 0:08:20</string></value>
</member>
<member>
<name>stderr_logfile</name>
<value><string>/var/log/{name}.err</string></value>
</member>
<member>
<name>stdout_logfile</name>
<value><string>/var/log/{name}.out</string></value>
</member>
<member>
<name>logfile</name>
<value><string>/var/log/{name}.out</string></value>
</member>
<member>
<name>start</name>
<value><int>{start}</int></value>
</member>
<member>
<name>stop</name>
<value><int>{stop}</int></value>
</member>
<member>
<name>now</name>
<value><int>{now}</int></value>
</member>
<member>
<name>exitstatus</name>
<value><int>0</int></value>
</member>
<member>
<name>spawnerr</name>
<value><string></string></value>
</member>
<member>
<name>pid</name>
<value><int>4242</int></value>
</member>
</struct></value>
</param>
</params>
</methodResponse>
"#
    )
}

/// A fault response as supervisord renders it
pub fn fault_response(code: i64, message: &str) -> String {
    format!(
        r#"<?xml version='1.0'?>
<methodResponse>
<fault>
<value><struct>
<member>
<name>faultCode</name>
<value><int>{code}</int></value>
</member>
<member>
<name>faultString</name>
<value><string>{message}</string></value>
</member>
</struct></value>
</fault>
</methodResponse>
"#
    )
}
