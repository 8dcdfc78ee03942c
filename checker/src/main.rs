//! supervisord-check binary entry point

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use shared::logging;
use supervisord_check::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SERVER_NAME, DEFAULT_TIMEOUT_SECS};
use supervisord_check::services::{
    DEFAULT_STATSD_ADDR, DogStatsdSink, JsonLinesSink, LogSink, RealSupervisorConnector,
};
use supervisord_check::{CheckConfig, InstanceConfig, MetricsSink, Scheduler, SupervisordCheck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SinkKind {
    /// Structured log lines
    Log,
    /// One JSON object per emission on stdout
    Json,
    /// DogStatsD datagrams over UDP
    Dogstatsd,
}

#[derive(Parser)]
#[command(name = "supervisord-check")]
#[command(about = "Reports supervisord process health as service checks and gauges")]
struct Args {
    /// YAML config file with an `instances` list
    #[arg(long, env = "SUPERVISORD_CHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Seconds between check cycles
    #[arg(long, default_value_t = 15)]
    interval: u64,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Where metrics are sent
    #[arg(long, value_enum, default_value_t = SinkKind::Log)]
    sink: SinkKind,

    /// DogStatsD address (only used with --sink dogstatsd)
    #[arg(long, default_value = DEFAULT_STATSD_ADDR)]
    statsd_addr: SocketAddr,

    /// Server label when no config file is given
    #[arg(long, default_value = DEFAULT_SERVER_NAME)]
    name: String,

    /// Supervisord host when no config file is given
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Supervisord port when no config file is given
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Supervisord username when no config file is given
    #[arg(long, env = "SUPERVISOR_USER")]
    user: Option<String>,

    /// Supervisord password when no config file is given
    #[arg(long, env = "SUPERVISOR_PASS", hide_env_values = true)]
    pass: Option<String>,

    /// Process to check (repeatable) when no config file is given
    #[arg(long = "proc-name")]
    proc_names: Vec<String>,

    /// Request timeout in seconds when no config file is given
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

impl Args {
    fn instances(&self) -> anyhow::Result<Vec<InstanceConfig>> {
        if let Some(path) = &self.config {
            let config = CheckConfig::from_path(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            return Ok(config.instances);
        }

        let instance = InstanceConfig {
            name: self.name.clone(),
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            pass: self.pass.clone(),
            proc_names: self.proc_names.clone(),
            timeout: self.timeout,
        };
        instance.validate().context("invalid command line instance")?;
        Ok(vec![instance])
    }
}

async fn build_sink(args: &Args) -> anyhow::Result<Box<dyn MetricsSink>> {
    Ok(match args.sink {
        SinkKind::Log => Box::new(LogSink::new()),
        SinkKind::Json => Box::new(JsonLinesSink::stdout()),
        SinkKind::Dogstatsd => Box::new(
            DogStatsdSink::bind(args.statsd_addr)
                .await
                .with_context(|| format!("binding DogStatsD socket for {}", args.statsd_addr))?,
        ),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    logging::init_tracing_with_level(Some(&args.log_level));

    let instances = args.instances()?;
    let sink = build_sink(&args).await?;
    let check = SupervisordCheck::new(RealSupervisorConnector::new(), sink);
    let scheduler = Scheduler::new(check, instances, Duration::from_secs(args.interval.max(1)));

    logging::log_startup(&format!(
        "supervisord check for {} instance(s)",
        scheduler.instances().len()
    ));

    if args.once {
        let outcomes = scheduler.run_cycle().await;
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            anyhow::bail!("{failed} of {} instance(s) failed", outcomes.len());
        }
        return Ok(());
    }

    scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await;

    Ok(())
}
