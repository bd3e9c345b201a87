//! Fleetroute - unified CLI entrypoint.
//!
//! Usage:
//!   fleetroute start --config config/fleetroute.toml [--watch]
//!   fleetroute config validate --config config/fleetroute.toml
//!   fleetroute targets [--format json]
//!   fleetroute route --project p --domain d --name n [--target id]
//!   fleetroute hash --project p --domain d --name n [--shards N]

use anyhow::Result;
use clap::Parser;
use fleetroute::cli::commands::{run_config, run_hash, run_route, run_start, run_targets};
use fleetroute::cli::{Cli, Commands};
use fleetroute::core::config::ConfigOverrides;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine config path - use global --config or default
    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config/fleetroute.toml"));

    let overrides = ConfigOverrides {
        log_level: cli.log_level.clone(),
        ..ConfigOverrides::default()
    };

    match cli.command {
        Commands::Start(args) => run_start(args, &config_path, cli.log_level).await,
        Commands::Config(args) => run_config(args, &config_path),
        Commands::Targets(args) => run_targets(args, &config_path, &overrides),
        Commands::Route(args) => run_route(args, &config_path, &overrides),
        Commands::Hash(args) => run_hash(args),
    }
}
