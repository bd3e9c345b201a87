//! Targets command implementation.

use super::load_config;
use crate::control::selector::{ClusterSelector, ExecutionCluster};
use crate::core::config::ConfigOverrides;
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// List configured execution targets.
#[derive(Args, Debug)]
pub struct TargetsArgs {
    /// Output format (text, json).
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// One row of the target listing.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TargetRow {
    pub id: String,
    pub endpoint: String,
    pub weight: u32,
    /// Share of auto-routed traffic, absent in local mode.
    pub share: Option<f64>,
}

pub(crate) fn target_rows(selector: &ClusterSelector) -> Vec<TargetRow> {
    let registry = selector.registry();
    let weighted = matches!(selector, ClusterSelector::Weighted(_));

    selector
        .all_valid_targets()
        .iter()
        .map(|target| TargetRow {
            id: target.id.clone(),
            endpoint: target
                .connection
                .endpoint
                .clone()
                .unwrap_or_else(|| "in-cluster".to_string()),
            weight: target.weight,
            share: if weighted {
                registry.weight_share(&target.id)
            } else {
                None
            },
        })
        .collect()
}

/// Run the targets command.
pub fn run_targets(
    args: TargetsArgs,
    config_path: &Path,
    overrides: &ConfigOverrides,
) -> Result<()> {
    let config = load_config(config_path, overrides)?;
    let selector = ClusterSelector::from_config(&config.execution, config.routing.hash_version)?;
    let rows = target_rows(&selector);

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            println!("Execution targets ({} mode)", selector.mode());
            println!("==========================");
            for row in &rows {
                let id = if row.id.is_empty() { "<local>" } else { row.id.as_str() };
                match row.share {
                    Some(share) => println!(
                        "  {:<20} weight {:>5} ({:>5.1}%)  {}",
                        id,
                        row.weight,
                        share * 100.0,
                        row.endpoint
                    ),
                    None => println!("  {:<20} {}", id, row.endpoint),
                }
            }
        }
    }

    Ok(())
}
