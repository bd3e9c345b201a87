//! Start command implementation.

use super::load_config;
use crate::core::config::ConfigOverrides;
use crate::core::runtime::Runtime;
use anyhow::Result;
use clap::Args;
use std::path::Path;

/// Run the selector runtime.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Watch the config file for changes, overriding `reload.enabled`.
    #[arg(long)]
    pub watch: bool,
}

/// Initialize tracing subscriber if the telemetry feature is enabled.
#[cfg(feature = "telemetry")]
fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "telemetry"))]
fn init_tracing(_default_level: &str) {}

/// Run the start command with the given config path.
pub async fn run_start(args: StartArgs, config_path: &Path, log_level: Option<String>) -> Result<()> {
    let overrides = ConfigOverrides {
        log_level,
        hash_version: None,
        reload_enabled: args.watch.then_some(true),
    };
    let config = load_config(config_path, &overrides)?;
    init_tracing(&config.telemetry.log_level);

    let mut runtime = Runtime::new(config, config_path)?;
    runtime.run().await
}
