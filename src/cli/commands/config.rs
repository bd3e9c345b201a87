//! Config command implementation.

use crate::control::selector::ClusterSelector;
use crate::core::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;

/// Configuration operations.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate configuration file and the target set it describes.
    Validate,
    /// Print configuration with defaults.
    Show {
        /// Output format (toml, json).
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

/// Run the config command.
pub fn run_config(args: ConfigArgs, config_path: &Path) -> Result<()> {
    match args.command {
        ConfigCommand::Validate => validate_config(config_path),
        ConfigCommand::Show { format } => show_config(config_path, &format),
    }
}

fn validate_config(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {:?}", path);
    }

    let config = Config::from_file(path)?;
    println!("✓ Config file is valid");

    let selector = ClusterSelector::from_config(&config.execution, config.routing.hash_version)?;
    let registry = selector.registry();
    println!(
        "  mode: {}, targets: {}, total weight: {}, hash: {}",
        selector.mode(),
        registry.len(),
        registry.total_weight(),
        config.routing.hash_version
    );

    for warning in config_warnings(&config) {
        println!("  ⚠ Warning: {}", warning);
    }

    println!("✓ Configuration validation complete");
    Ok(())
}

/// Non-fatal issues worth surfacing to operators.
fn config_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    for target in &config.execution.targets {
        if !target.enabled {
            warnings.push(format!("target {} is disabled", target.id));
        } else if target.weight == 0 {
            warnings.push(format!(
                "target {} has weight 0 and is reachable only by explicit id",
                target.id
            ));
        }
        if target.connection.insecure {
            warnings.push(format!("target {} skips TLS verification", target.id));
        }
    }

    if config.execution.targets.iter().all(|t| !t.enabled) {
        warnings.push("no targets enabled; serving the in-cluster target only".to_string());
    }

    warnings
}

fn show_config(path: &Path, format: &str) -> Result<()> {
    let config = Config::from_file(path)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        _ => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
