//! Execution cluster selection.
//!
//! - [`identifier`] - Named entity identifiers (the routing keys)
//! - [`hashing`] - Stable identifier hashing and shard bucketing
//! - [`target`] - Execution targets, connection config and overrides
//! - [`registry`] - Immutable target registry with cumulative-weight index
//! - [`selector`] - Local and weighted selection strategies
//! - [`snapshot`] - Atomic-swap selector snapshots for reload
//! - [`whitelist`] - Task type whitelist scoped by project and domain
//!
//! # Determinism
//!
//! Auto-routing depends only on the identifier, the configured hash version
//! and the ordered target list. Retried or replayed executions land on the
//! same cluster without consulting stored state, as long as the target list
//! is unchanged.

pub mod hashing;
pub mod identifier;
pub mod registry;
pub mod selector;
pub mod snapshot;
pub mod target;
pub mod whitelist;
