//! Route command implementation.

use super::load_config;
use crate::control::hashing::compute_routing_hash;
use crate::control::identifier::NamedEntityIdentifier;
use crate::control::selector::{ClusterSelector, ExecutionCluster};
use crate::control::target::ExecutionTargetSpec;
use crate::core::config::ConfigOverrides;
use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::path::Path;

/// Resolve the execution target for an entity.
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Entity project.
    #[arg(long)]
    pub project: String,

    /// Entity domain.
    #[arg(long)]
    pub domain: String,

    /// Entity name.
    #[arg(long)]
    pub name: String,

    /// Explicit target id.
    #[arg(long)]
    pub target: Option<String>,

    /// Output format (text, json).
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Run the route command.
pub fn run_route(args: RouteArgs, config_path: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let selector = ClusterSelector::from_config(&config.execution, config.routing.hash_version)?;

    let identifier = NamedEntityIdentifier::new(args.project, args.domain, args.name);
    let spec = args.target.map(ExecutionTargetSpec::for_target);
    let target = selector.get_target(&identifier, spec.as_ref())?;
    let hash = compute_routing_hash(&identifier, config.routing.hash_version);

    match args.format.as_str() {
        "json" => {
            let output = json!({
                "identifier": identifier,
                "mode": selector.mode().to_string(),
                "hash": hash,
                "hash_version": config.routing.hash_version,
                "target": &*target,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            let id = if target.id.is_empty() { "<local>" } else { target.id.as_str() };
            println!("{} -> {}", identifier, id);
        }
    }

    Ok(())
}
