//! DogStatsD sink: gauges and service checks as UDP datagrams

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::debug;

use shared::{Gauge, ServiceCheck};
use crate::error::CheckResult;
use crate::traits::MetricsSink;

pub const DEFAULT_STATSD_ADDR: &str = "127.0.0.1:8125";

pub struct DogStatsdSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl DogStatsdSink {
    /// Bind an ephemeral local socket for sending to `target`
    pub async fn bind(target: SocketAddr) -> CheckResult<Self> {
        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    async fn send(&self, datagram: &str) -> CheckResult<()> {
        debug!(target_addr = %self.target, datagram, "statsd send");
        self.socket.send_to(datagram.as_bytes(), self.target).await?;
        Ok(())
    }
}

#[async_trait]
impl MetricsSink for DogStatsdSink {
    async fn service_check(&self, check: &ServiceCheck) -> CheckResult<()> {
        self.send(&format_service_check(check)).await
    }

    async fn gauge(&self, gauge: &Gauge) -> CheckResult<()> {
        self.send(&format_gauge(gauge)).await
    }
}

/// `<name>:<value>|g|#<tags>`
pub fn format_gauge(gauge: &Gauge) -> String {
    let mut datagram = format!("{}:{}|g", gauge.name, gauge.value);
    push_tags(&mut datagram, &gauge.tags);
    datagram
}

/// `_sc|<name>|<status>|#<tags>|m:<message>`; the message goes last with newlines escaped
pub fn format_service_check(check: &ServiceCheck) -> String {
    let mut datagram = format!("_sc|{}|{}", check.name, check.status.status_code());
    push_tags(&mut datagram, &check.tags);
    if !check.message.is_empty() {
        datagram.push_str("|m:");
        datagram.push_str(&check.message.replace('\n', "\\n"));
    }
    datagram
}

fn push_tags(datagram: &mut String, tags: &[String]) {
    if !tags.is_empty() {
        datagram.push_str("|#");
        datagram.push_str(&tags.join(","));
    }
}
