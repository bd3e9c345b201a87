//! Selector snapshots for configuration reload.
//!
//! A reload never mutates the live selector. A complete replacement is built
//! from the new configuration and installed with a single atomic pointer
//! swap, so readers observe either the old snapshot or the new one in full
//! and never take a lock.

use crate::control::hashing::HashVersion;
use crate::control::identifier::NamedEntityIdentifier;
use crate::control::selector::{ClusterSelector, ExecutionCluster};
use crate::control::target::{ExecutionTarget, ExecutionTargetSpec};
use crate::core::config::ExecutionConfig;
use crate::core::error::RouteResult;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared handle to the current selector snapshot.
pub struct SelectorHandle {
    current: ArcSwap<ClusterSelector>,

    /// Bumped on every successful swap. Starts at 1.
    generation: AtomicU64,
}

impl SelectorHandle {
    /// Create a handle serving `selector`.
    pub fn new(selector: ClusterSelector) -> Self {
        Self {
            current: ArcSwap::from_pointee(selector),
            generation: AtomicU64::new(1),
        }
    }

    /// Build the initial snapshot from configuration.
    pub fn from_config(config: &ExecutionConfig, hash_version: HashVersion) -> RouteResult<Self> {
        ClusterSelector::from_config(config, hash_version).map(Self::new)
    }

    /// The selector current at the time of the call.
    ///
    /// The returned snapshot stays valid for as long as the caller holds it,
    /// even if a reload swaps in a newer one meanwhile.
    pub fn load(&self) -> Arc<ClusterSelector> {
        self.current.load_full()
    }

    /// Install a fully built selector. Returns the new generation.
    pub fn replace(&self, selector: ClusterSelector) -> u64 {
        self.current.store(Arc::new(selector));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(generation, "execution cluster snapshot swapped");
        generation
    }

    /// Rebuild from configuration and swap.
    ///
    /// On misconfiguration the current snapshot stays in place and the error
    /// is returned.
    pub fn reload(&self, config: &ExecutionConfig, hash_version: HashVersion) -> RouteResult<u64> {
        match ClusterSelector::from_config(config, hash_version) {
            Ok(selector) => Ok(self.replace(selector)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    generation = self.generation(),
                    "rejected execution cluster reload; keeping current snapshot"
                );
                Err(e)
            }
        }
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl ExecutionCluster for SelectorHandle {
    fn get_target(
        &self,
        identifier: &NamedEntityIdentifier,
        spec: Option<&ExecutionTargetSpec>,
    ) -> RouteResult<Arc<ExecutionTarget>> {
        self.current.load().get_target(identifier, spec)
    }

    fn all_valid_targets(&self) -> Vec<Arc<ExecutionTarget>> {
        self.current.load().all_valid_targets()
    }
}

impl std::fmt::Debug for SelectorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorHandle")
            .field("generation", &self.generation())
            .field("mode", &self.current.load().mode())
            .finish()
    }
}
