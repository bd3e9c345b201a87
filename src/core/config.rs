//! Configuration parsing and validation.
//!
//! Configuration is loaded from a TOML file with CLI overrides. The execution
//! section lists targets in the order that defines the cumulative-weight
//! ranges, so reordering targets reroutes auto-routed traffic.

use crate::control::hashing::HashVersion;
use crate::control::selector::ClusterSelector;
use crate::control::target::ConnectionConfig;
use crate::control::whitelist::TaskTypeWhitelist;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Execution targets and operating mode.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Routing hash settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Hot-reload configuration.
    #[serde(default)]
    pub reload: ReloadConfig,

    /// Task types restricted to specific projects and domains.
    #[serde(default)]
    pub task_type_whitelist: TaskTypeWhitelist,
}

/// How the selector strategy is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Local for zero or one target, multi for two or more.
    #[default]
    Auto,
    /// Single cluster; explicit remote targets are rejected.
    Local,
    /// Weighted hashing across a fleet.
    Multi,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Local => write!(f, "local"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

/// Execution section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Targets in routing order.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// A configured execution target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub id: String,

    #[serde(default = "default_weight")]
    pub weight: u32,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Routing hash settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub hash_version: HashVersion,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Hot-reload configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Watch the config file and swap in new snapshots.
    #[serde(default)]
    pub enabled: bool,

    /// Poll period in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// Default value functions

fn default_weight() -> u32 {
    1
}

fn default_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string without validating it.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "failed to parse config")
    }

    /// Apply CLI overrides to the configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref log_level) = overrides.log_level {
            self.telemetry.log_level = log_level.clone();
        }
        if let Some(hash_version) = overrides.hash_version {
            self.routing.hash_version = hash_version;
        }
        if let Some(enabled) = overrides.reload_enabled {
            self.reload.enabled = enabled;
        }
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_telemetry()?;
        self.validate_reload()?;
        self.validate_execution()?;
        self.validate_whitelist()?;
        Ok(())
    }

    fn validate_telemetry(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "telemetry.log_level must be one of {:?}, got: {}",
                valid_levels,
                self.telemetry.log_level
            );
        }
        Ok(())
    }

    fn validate_reload(&self) -> Result<()> {
        if self.reload.poll_interval_ms == 0 {
            anyhow::bail!("reload.poll_interval_ms must be > 0");
        }
        Ok(())
    }

    fn validate_execution(&self) -> Result<()> {
        for (position, target) in self.execution.targets.iter().enumerate() {
            if target.id.trim().is_empty() {
                anyhow::bail!("execution.targets[{}].id must not be empty", position);
            }
        }

        // Build once so a bad target set refuses to start instead of failing
        // requests later.
        ClusterSelector::from_config(&self.execution, self.routing.hash_version)
            .with_context(|| "invalid execution targets")?;
        Ok(())
    }

    fn validate_whitelist(&self) -> Result<()> {
        if self.task_type_whitelist.scopes("").is_some() {
            anyhow::bail!("task_type_whitelist keys must not be empty");
        }
        Ok(())
    }
}

/// CLI override options that can be applied to configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override log level.
    pub log_level: Option<String>,
    /// Override routing hash version.
    pub hash_version: Option<HashVersion>,
    /// Force reload watching on or off.
    pub reload_enabled: Option<bool>,
}
