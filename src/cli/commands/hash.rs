//! Hash command implementation.

use crate::control::hashing::{compute_routing_hash, shard_index, HashVersion};
use crate::control::identifier::NamedEntityIdentifier;
use anyhow::Result;
use clap::Args;

/// Print the routing hash of an entity.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Entity project.
    #[arg(long)]
    pub project: String,

    /// Entity domain.
    #[arg(long)]
    pub domain: String,

    /// Entity name.
    #[arg(long)]
    pub name: String,

    /// Hash algorithm version (v1, v2).
    #[arg(long, default_value = "v1")]
    pub hash_version: HashVersion,

    /// Also print the shard bucket for this many shards.
    #[arg(long)]
    pub shards: Option<u32>,
}

/// Run the hash command.
pub fn run_hash(args: HashArgs) -> Result<()> {
    let identifier = NamedEntityIdentifier::new(args.project, args.domain, args.name);
    let hash = compute_routing_hash(&identifier, args.hash_version);
    println!("{} ({}): {}", identifier, args.hash_version, hash);

    if let Some(shards) = args.shards {
        let shard = shard_index(&identifier, shards, args.hash_version)?;
        println!("shard: {} of {}", shard, shards);
    }

    Ok(())
}
