//! `trafficlens`: terminal dashboard for live network-traffic telemetry.
//!
//! Connects to a detection server over Socket.IO and renders what it
//! pushes: counters, a NORMAL/ATTACK chart, live packets, flagged
//! sources, an alert banner and a log panel. Keys `s`/`x` start and stop
//! monitoring on the server, `b` blocks the flagged sources.
//!
//! Logs are written to a file (default `<temp dir>/trafficlens.log`) to
//! avoid corrupting the terminal UI.

mod action;
mod app;
mod bridge;
mod event;
mod theme;
mod timer;
mod tui;
mod view;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use trafficlens_config::Config;

use crate::app::App;

/// Terminal dashboard for a network-traffic detection server.
#[derive(Parser, Debug)]
#[command(name = "trafficlens", version, about)]
struct Cli {
    /// Detection server URL (e.g., http://localhost:5000)
    #[arg(short = 'u', long, env = "TRAFFICLENS_URL")]
    url: Option<String>,

    /// Config file path (defaults to the platform config dir)
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file path (defaults to <temp dir>/trafficlens.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal UI is up. The returned guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "trafficlens={log_level},trafficlens_core={log_level},trafficlens_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("trafficlens.log"));
    let temp_dir = std::env::temp_dir();
    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(temp_dir.as_path());
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("trafficlens.log"));

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

/// Config file → environment → `--url`, validated.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(trafficlens_config::config_path);
    Ok(trafficlens_config::load_config(&path, cli.url.as_deref())?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let config = resolve_config(&cli)?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let _log_guard = setup_tracing(&cli);

    info!(url = %config.server.url, "starting trafficlens");

    let mut app = App::new(&config)?;
    app.run().await?;

    Ok(())
}
