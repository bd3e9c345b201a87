//! CLI command implementations.

mod config;
mod hash;
mod route;
mod start;
mod targets;

pub use config::{run_config, ConfigArgs};
pub use hash::{run_hash, HashArgs};
pub use route::{run_route, RouteArgs};
pub use start::{run_start, StartArgs};
pub use targets::{run_targets, TargetsArgs};

use crate::core::config::{Config, ConfigOverrides};
use anyhow::{Context, Result};
use std::path::Path;

/// Load the config file and apply global CLI overrides.
pub(crate) fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<Config> {
    let mut config = Config::from_file(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}
