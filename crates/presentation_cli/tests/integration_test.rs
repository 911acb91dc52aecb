//! Integration tests for CLI
//!
//! These tests verify command-line parsing without touching the network.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

// Mock CLI structure for testing (mirrors main.rs)
#[derive(Parser)]
#[command(name = "bustracker")]
#[command(author, version, about = "Tells you when to leave for the bus", long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    stop: Option<String>,

    #[arg(long, global = true)]
    stop_id: Option<String>,

    #[arg(short, long, global = true)]
    destination: Option<String>,

    #[arg(short, long, global = true)]
    walk_minutes: Option<u32>,

    #[arg(short, long, global = true)]
    interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    Watch,
    Once {
        #[arg(long)]
        json: bool,
    },
    Stops {
        query: String,
        #[arg(short, long, default_value = "10")]
        limit: u8,
    },
    Config,
}

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_defaults_to_no_subcommand() {
    let cli = parse_args(&["bustracker"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.verbose, 0);
}

#[test]
fn cli_parses_watch_command() {
    let cli = parse_args(&["bustracker", "watch"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Watch)));
}

#[test]
fn cli_parses_once_with_json() {
    let cli = parse_args(&["bustracker", "once", "--json"]).unwrap();
    if let Some(Commands::Once { json }) = cli.command {
        assert!(json);
    } else {
        panic!("Expected Once command");
    }
}

#[test]
fn cli_parses_stops_query() {
    let cli = parse_args(&["bustracker", "stops", "Parkring Süd"]).unwrap();
    if let Some(Commands::Stops { query, limit }) = cli.command {
        assert_eq!(query, "Parkring Süd");
        assert_eq!(limit, 10);
    } else {
        panic!("Expected Stops command");
    }
}

#[test]
fn cli_parses_stops_with_limit() {
    let cli = parse_args(&["bustracker", "stops", "Garching", "--limit", "3"]).unwrap();
    if let Some(Commands::Stops { limit, .. }) = cli.command {
        assert_eq!(limit, 3);
    } else {
        panic!("Expected Stops command");
    }
}

#[test]
fn cli_requires_stops_query() {
    assert!(parse_args(&["bustracker", "stops"]).is_err());
}

#[test]
fn cli_parses_config_command() {
    let cli = parse_args(&["bustracker", "config"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Config)));
}

#[test]
fn cli_parses_global_overrides_after_subcommand() {
    let cli = parse_args(&[
        "bustracker",
        "watch",
        "--stop",
        "Parkring Süd",
        "-d",
        "Garching, Forschungszentrum (U)",
        "-w",
        "7",
        "-i",
        "15",
    ])
    .unwrap();

    assert_eq!(cli.stop.as_deref(), Some("Parkring Süd"));
    assert_eq!(
        cli.destination.as_deref(),
        Some("Garching, Forschungszentrum (U)")
    );
    assert_eq!(cli.walk_minutes, Some(7));
    assert_eq!(cli.interval, Some(15));
}

#[test]
fn cli_parses_config_path_and_stop_id() {
    let cli = parse_args(&[
        "bustracker",
        "--config",
        "/etc/bustracker.toml",
        "--stop-id",
        "de:09184:2510",
        "once",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("/etc/bustracker.toml")));
    assert_eq!(cli.stop_id.as_deref(), Some("de:09184:2510"));
}

#[test]
fn cli_counts_verbosity() {
    let cli = parse_args(&["bustracker", "-vvv"]).unwrap();
    assert_eq!(cli.verbose, 3);
}

#[test]
fn cli_rejects_negative_walk() {
    assert!(parse_args(&["bustracker", "--walk-minutes", "-5"]).is_err());
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(parse_args(&["bustracker", "teleport"]).is_err());
}
