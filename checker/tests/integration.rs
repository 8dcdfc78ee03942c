//! Integration tests for the check against a mock supervisord over HTTP

mod common;

use std::io::Write;
use std::time::Duration;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{RecordingSink, TestFixtures, TestHelpers};
use shared::metric_names::{
    CHECK_RUN, PROCESS_DOWN, PROCESS_TOTAL, PROCESS_UNKNOWN, PROCESS_UP, PROCESS_UPTIME,
};
use shared::HealthLevel;
use supervisord_check::*;

/// Mock supervisord answering `getProcessInfo` for each record of the fleet
async fn supervisord_with(fleet: &[shared::ProcessInfo]) -> MockServer {
    let server = MockServer::start().await;
    for info in fleet {
        Mock::given(method("POST"))
            .and(path("/RPC2"))
            .and(body_string_contains(format!("<string>{}</string>", info.name)))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(TestFixtures::process_info_xml(info)),
            )
            .mount(&server)
            .await;
    }
    server
}

fn instance_for(server: &MockServer, proc_names: &[&str]) -> InstanceConfig {
    let addr = server.address();
    let mut instance = TestHelpers::instance(TestFixtures::SERVER, &addr.ip().to_string(), proc_names);
    instance.port = addr.port();
    instance.timeout = 5;
    instance
}

#[tokio::test]
async fn test_end_to_end_mixed_fleet() {
    let server = supervisord_with(&TestFixtures::mixed_fleet()).await;
    let sink = RecordingSink::new();
    let check = SupervisordCheck::new(RealSupervisorConnector::new(), sink.clone());

    let counts = check
        .run(&instance_for(&server, &["api", "worker", "cron"]))
        .await
        .unwrap();

    assert_eq!(counts.total, 3);
    let statuses: Vec<HealthLevel> = sink.service_checks().iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![HealthLevel::Healthy, HealthLevel::Critical, HealthLevel::Indeterminate]
    );
    assert_eq!(
        sink.service_checks()[0].tags,
        TestHelpers::process_tags(TestFixtures::SERVER, "api")
    );
    assert_eq!(sink.gauge_value(PROCESS_UPTIME), Some(500.0));
    assert_eq!(sink.gauge_value(PROCESS_TOTAL), Some(3.0));
    assert_eq!(sink.gauge_value(PROCESS_UP), Some(1.0));
    assert_eq!(sink.gauge_value(PROCESS_DOWN), Some(1.0));
    assert_eq!(sink.gauge_value(PROCESS_UNKNOWN), Some(1.0));
}

#[tokio::test]
async fn test_end_to_end_fault_emits_nothing() {
    let server = supervisord_with(&TestFixtures::mixed_fleet()).await;
    Mock::given(method("POST"))
        .and(body_string_contains("<string>ghost</string>"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(TestFixtures::fault_xml(10, "BAD_NAME: ghost")),
        )
        .mount(&server)
        .await;

    let sink = RecordingSink::new();
    let check = SupervisordCheck::new(RealSupervisorConnector::new(), sink.clone());
    let err = check
        .run(&instance_for(&server, &["api", "ghost"]))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::RemoteFault { code: 10, .. }));
    assert!(sink.emissions().is_empty());
}

#[tokio::test]
async fn test_end_to_end_unmapped_state_emits_nothing() {
    let mut fleet = TestFixtures::mixed_fleet();
    fleet.push(TestFixtures::process_info("odd", "HIBERNATING"));
    let server = supervisord_with(&fleet).await;

    let sink = RecordingSink::new();
    let check = SupervisordCheck::new(RealSupervisorConnector::new(), sink.clone());
    let err = check
        .run(&instance_for(&server, &["api", "odd"]))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::Classification { .. }));
    assert!(sink.emissions().is_empty());
}

#[tokio::test]
async fn test_config_file_drives_a_cycle() {
    let server = supervisord_with(&TestFixtures::mixed_fleet()).await;
    let addr = server.address();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"instances:
  - name: {server_name}
    host: {host}
    port: "{port}"
    proc_names: [api, cron]
    timeout: 5
"#,
        server_name = TestFixtures::SERVER,
        host = addr.ip(),
        port = addr.port(),
    )
    .unwrap();

    let config = CheckConfig::from_path(file.path()).unwrap();
    assert_eq!(config.instances.len(), 1);
    assert_eq!(config.instances[0].port, addr.port());

    let sink = RecordingSink::new();
    let check = SupervisordCheck::new(RealSupervisorConnector::new(), sink.clone());
    let scheduler = Scheduler::new(check, config.instances, Duration::from_secs(15));

    let outcomes = scheduler.run_cycle().await;
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result.as_ref().unwrap().total, 2);

    let run = sink
        .service_checks()
        .into_iter()
        .find(|c| c.name == CHECK_RUN)
        .unwrap();
    assert_eq!(run.status, HealthLevel::Healthy);
}

#[tokio::test]
async fn test_json_sink_end_to_end() {
    let server = supervisord_with(&TestFixtures::mixed_fleet()).await;
    let check = SupervisordCheck::new(RealSupervisorConnector::new(), JsonLinesSink::new(Vec::new()));

    check.run(&instance_for(&server, &["worker"])).await.unwrap();

    let output = String::from_utf8(check.into_sink().into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0]["type"], "service_check");
    assert_eq!(lines[0]["status"], "critical");
    assert_eq!(lines[1]["name"], PROCESS_UPTIME);
    assert_eq!(lines[1]["value"], 0.0);
    assert_eq!(lines[4]["name"], PROCESS_DOWN);
    assert_eq!(lines[4]["value"], 1.0);
}
