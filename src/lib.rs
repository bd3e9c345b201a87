//! Fleetroute - execution cluster selection for a workflow control plane.
//!
//! For every task or workflow execution request, fleetroute decides which
//! downstream execution cluster runs it. The decision is deterministic, so
//! retries and replays land on the same cluster, and callers may pin an
//! execution to a specific cluster by id.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │             Request handlers / dispatch layer (external)        │
//! └─────────────────────────────────────────────────────────────────┘
//!              │ NamedEntityIdentifier + Option<ExecutionTargetSpec>
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SelectorHandle                           │
//! │                (atomic snapshot swap on reload)                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        ClusterSelector                          │
//! │         LocalCluster        │       WeightedCluster             │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌──────────────────────────────┐ ┌────────────────────────────────┐
//! │        TargetRegistry        │ │       Identifier hashing       │
//! │  targets │ cumulative index  │ │      FNV-1 (v1) │ xxHash64 (v2) │
//! └──────────────────────────────┘ └────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! ## Core
//! - [`core::config`] - Configuration parsing and validation
//! - [`core::runtime`] - Runtime orchestration and reload polling
//! - [`core::error`] - Error types and status mapping
//!
//! ## Control
//! - [`control::hashing`] - Stable identifier hashing
//! - [`control::registry`] - Target registry
//! - [`control::selector`] - Selection strategies
//! - [`control::snapshot`] - Reloadable snapshots
//! - [`control::whitelist`] - Task type whitelist
//!
//! ## CLI
//! - [`cli::commands`] - CLI command implementations

// Core infrastructure
pub mod core;

// Target selection
pub mod control;

// CLI
pub mod cli;

// Re-exports for convenience
pub use self::core::{config, error, runtime};
pub use control::hashing::{compute_routing_hash, hash_identifier, shard_index, HashVersion};
pub use control::identifier::NamedEntityIdentifier;
pub use control::registry::TargetRegistry;
pub use control::selector::{ClusterSelector, ExecutionCluster, LocalCluster, WeightedCluster};
pub use control::snapshot::SelectorHandle;
pub use control::target::{ConnectionConfig, ExecutionTarget, ExecutionTargetSpec};
pub use control::whitelist::{TaskTypeWhitelist, WhitelistScope};
pub use error::{RouteError, RouteResult};
