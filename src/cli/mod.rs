//! Command-line interface.
//!
//! Unified CLI for fleetroute operations.

pub mod commands;

use clap::{Parser, Subcommand};

/// Fleetroute - execution cluster selection for workflow executions.
#[derive(Parser, Debug)]
#[command(name = "fleetroute")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the selector runtime and watch for configuration reloads.
    Start(commands::StartArgs),
    /// Configuration operations.
    Config(commands::ConfigArgs),
    /// List configured execution targets.
    Targets(commands::TargetsArgs),
    /// Resolve the execution target for an entity.
    Route(commands::RouteArgs),
    /// Print the routing hash of an entity.
    Hash(commands::HashArgs),
}
