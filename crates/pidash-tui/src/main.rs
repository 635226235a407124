//! `pidash`: terminal dashboard for a Raspberry Pi gateway.
//!
//! Polls the gateway's Netdata agent for CPU, memory, uptime and
//! temperature, shows link and service status, and drives the gateway's
//! shutdown / reboot endpoints with a confirm-then-countdown sequence.
//!
//! Logs go to a file (default `/tmp/pidash.log`) so they never corrupt the
//! terminal. Configuration comes from the TOML file, `PIDASH_*` variables
//! and the flags below, in increasing priority.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use pidash_config::{Config, ConfigError};
use pidash_core::{EndpointPolicy, FallbackPolicy};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal dashboard for a Netdata-monitored Raspberry Pi gateway.
#[derive(Parser, Debug)]
#[command(name = "pidash", version, about)]
struct Cli {
    /// Gateway host running Netdata (e.g. 192.168.4.1)
    #[arg(long)]
    host: Option<String>,

    /// Netdata agent port
    #[arg(short, long)]
    port: Option<u16>,

    /// Origin serving /netdata and /api (defaults to http://<host>)
    #[arg(long)]
    origin: Option<String>,

    /// Seconds between automatic refreshes
    #[arg(short, long)]
    interval: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// How metric endpoints are tried: fan-out or strict-single
    #[arg(long)]
    endpoint_policy: Option<EndpointPolicy>,

    /// What to show when metrics are missing: placeholder or demo-values
    #[arg(long)]
    fallback_policy: Option<FallbackPolicy>,

    /// Config file path (defaults to the platform config directory)
    #[arg(short, long, env = "PIDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Skip the startup splash
    #[arg(long)]
    no_splash: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/pidash.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the returned guard until exit so buffered lines
/// are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pidash={level},pidash_core={level},pidash_api={level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("pidash.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// File and environment first, then flags on top.
fn resolve_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => pidash_config::load_config_from(path)?,
        None => pidash_config::load_config()?,
    };

    if let Some(host) = &cli.host {
        config.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.netdata_port = port;
    }
    if let Some(origin) = &cli.origin {
        config.origin = Some(origin.clone());
    }
    if let Some(interval) = cli.interval {
        config.refresh_interval_secs = interval;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(policy) = cli.endpoint_policy {
        config.endpoint_policy = policy;
    }
    if let Some(policy) = cli.fallback_policy {
        config.fallback_policy = policy;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched so early panics print cleanly.
    tui::install_hooks()?;

    let config = resolve_config(&cli)?;
    let dashboard = config.to_dashboard_config()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let _log_guard = setup_tracing(&cli);

    info!(
        host = %dashboard.host,
        origin = %dashboard.origin,
        interval = ?dashboard.refresh_interval,
        "starting pidash"
    );

    let mut app = App::new(&dashboard, !cli.no_splash)?;
    app.run().await?;

    Ok(())
}
