//! BusTracker CLI
//!
//! Watches the departures at one stop and tells you when to leave.

#![allow(clippy::print_stdout)]

mod render;

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use application::ports::{DepartureSourcePort, MonitorEvent};
use application::{DepartureMonitor, RefreshHandle, StopResolver};
use clap::{Parser, Subcommand};
use domain::TransitStop;
use infrastructure::{
    AppConfig, ChannelDashboard, DEFAULT_DASHBOARD_CAPACITY, MvgDepartureAdapter, init_logging,
    retry,
};
use tokio::signal;
use tracing::{debug, error, info, warn};

use crate::render::{DashboardView, render_snapshot};

/// BusTracker CLI
#[derive(Parser)]
#[command(name = "bustracker")]
#[command(author, version, about = "Tells you when to leave for the bus", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "BUSTRACKER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Stop name to look up
    #[arg(long, global = true)]
    stop: Option<String>,

    /// Stop id; skips the lookup
    #[arg(long, global = true)]
    stop_id: Option<String>,

    /// Destination to track, matched exactly
    #[arg(short, long, global = true)]
    destination: Option<String>,

    /// Walk to the stop in minutes
    #[arg(short, long, global = true)]
    walk_minutes: Option<u32>,

    /// Seconds between polls
    #[arg(short, long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll continuously and redraw the dashboard (default)
    ///
    /// Press Enter to refresh immediately, Ctrl+C to quit.
    Watch,

    /// Poll once, print the result and exit
    ///
    /// Exits with a non-zero status when the departure source is unavailable.
    Once {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search stops by name
    ///
    /// Example: bustracker stops "Parkring"
    Stops {
        /// Name to search for
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: u8,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Determine log filter from verbosity count (None = use configuration)
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(stop) = &cli.stop {
        config.tracker.stop_name.clone_from(stop);
        config.tracker.stop_id = None;
    }
    if let Some(stop_id) = &cli.stop_id {
        config.tracker.stop_id = Some(stop_id.clone());
    }
    if let Some(destination) = &cli.destination {
        config.tracker.target_destination.clone_from(destination);
    }
    if let Some(walk) = cli.walk_minutes {
        config.tracker.walk_minutes = walk;
    }
    if let Some(interval) = cli.interval {
        config.tracker.poll_interval_secs = interval;
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, cli);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_logging(&config.logging, log_filter_from_verbosity(cli.verbose))?;

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => watch(&config).await?,
        Commands::Once { json } => once(&config, json).await?,
        Commands::Stops { query, limit } => stops(&config, &query, limit).await?,
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

fn departure_source(config: &AppConfig) -> anyhow::Result<Arc<dyn DepartureSourcePort>> {
    let adapter = MvgDepartureAdapter::from_config(&config.transit)?;
    Ok(Arc::new(adapter))
}

/// Warn early when the departure API does not answer
async fn check_source(source: &dyn DepartureSourcePort) {
    if source.is_available().await {
        debug!("Departure source reachable");
    } else {
        warn!("Departure source did not answer the health check, polling anyway");
    }
}

/// Resolve the configured stop, retrying transient failures
async fn resolve_stop(
    config: &AppConfig,
    source: Arc<dyn DepartureSourcePort>,
) -> anyhow::Result<TransitStop> {
    let resolver = StopResolver::new(source);
    let selector = config.tracker.stop_selector();

    let resolver = &resolver;
    let selector = &selector;
    let stop = retry(&config.retry, move || resolver.resolve(selector))
        .await
        .with_context(|| format!("Could not resolve stop '{}'", config.tracker.stop_name))?;

    Ok(stop)
}

async fn watch(config: &AppConfig) -> anyhow::Result<()> {
    let source = departure_source(config)?;
    check_source(source.as_ref()).await;
    let stop = resolve_stop(config, Arc::clone(&source)).await?;

    let (dashboard, mut events) = ChannelDashboard::channel(DEFAULT_DASHBOARD_CAPACITY);
    let monitor = DepartureMonitor::new(source, config.tracker.monitor_config(stop)?);
    spawn_refresh_listener(monitor.refresh_handle());

    let monitor_task =
        tokio::spawn(async move { monitor.run(&dashboard, shutdown_signal()).await });

    let mut view = DashboardView::new();
    let clear = std::io::stdout().is_terminal();
    while let Some(event) = events.recv().await {
        view.apply(event);
        draw(&view.render(&chrono::Local), clear)?;
    }

    monitor_task.await??;
    info!("Bye");
    Ok(())
}

async fn once(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let source = departure_source(config)?;
    check_source(source.as_ref()).await;
    let stop = resolve_stop(config, Arc::clone(&source)).await?;

    let mut monitor = DepartureMonitor::new(source, config.tracker.monitor_config(stop)?);

    let event = monitor.poll_once().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    match event {
        MonitorEvent::Snapshot(snapshot) => {
            if !json {
                print!("{}", render_snapshot(&snapshot, &chrono::Local));
            }
            Ok(())
        },
        MonitorEvent::SourceUnavailable { message, .. } => {
            anyhow::bail!("DATA FETCH ERROR: {message}")
        },
    }
}

async fn stops(config: &AppConfig, query: &str, limit: u8) -> anyhow::Result<()> {
    let resolver = StopResolver::new(departure_source(config)?);
    let found = resolver.search(query, limit).await?;

    if found.is_empty() {
        println!("No stops matching '{query}'");
        return Ok(());
    }

    for stop in found {
        println!("{:<20} {stop}", stop.id);
    }
    Ok(())
}

fn draw(frame: &str, clear: bool) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    if clear {
        write!(stdout, "\x1B[2J\x1B[H")?;
    }
    write!(stdout, "{frame}")?;
    stdout.flush()
}

/// Trigger a refresh for every line read from stdin
fn spawn_refresh_listener(refresh: RefreshHandle) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if line.is_err() {
                break;
            }
            debug!("Refresh requested from keyboard");
            refresh.trigger();
        }
    });
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, stopping"),
        () = terminate => info!("Received SIGTERM, stopping"),
    }
}
