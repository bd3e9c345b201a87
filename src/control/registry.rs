//! Execution target registry.
//!
//! The registry is built once from configuration and never mutated. It keeps
//! targets in configuration order together with a prefix-sum index over their
//! weights, so that a routing hash is mapped to a target by binary search:
//!
//! ```text
//! weights     [3, 0, 1]
//! cumulative  [3, 3, 4]    total_weight = 4
//! point = hash % 4:  0..3 -> targets[0], 3 -> targets[2]
//! ```
//!
//! Zero-weight targets own an empty range. They are never auto-routed but stay
//! reachable through [`TargetRegistry::lookup`].

use crate::control::target::ExecutionTarget;
use crate::core::error::{RouteError, RouteResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable set of configured execution targets.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    /// Targets in configuration order.
    targets: Vec<Arc<ExecutionTarget>>,

    /// Target id to position in `targets`.
    index: HashMap<String, usize>,

    /// `cumulative[i]` is the sum of weights of `targets[..=i]`.
    cumulative: Vec<u64>,

    total_weight: u64,
}

impl TargetRegistry {
    /// Build a registry holding exactly one target. Its weight is ignored.
    pub fn single(target: impl Into<Arc<ExecutionTarget>>) -> Self {
        let target = target.into();
        let mut index = HashMap::with_capacity(1);
        index.insert(target.id.clone(), 0);
        let weight = u64::from(target.weight);
        Self {
            targets: vec![target],
            index,
            cumulative: vec![weight],
            total_weight: weight,
        }
    }

    /// Build a registry for weighted routing.
    ///
    /// Fails on an empty target list, an empty or duplicate id, or a total
    /// weight of zero.
    pub fn weighted(targets: Vec<ExecutionTarget>) -> RouteResult<Self> {
        if targets.is_empty() {
            return Err(RouteError::NoTargets);
        }

        let mut index = HashMap::with_capacity(targets.len());
        let mut cumulative = Vec::with_capacity(targets.len());
        let mut total_weight = 0u64;

        for (position, target) in targets.iter().enumerate() {
            if target.id.is_empty() {
                return Err(RouteError::invalid_config(format!(
                    "execution target at position {} has an empty id",
                    position
                )));
            }
            if index.insert(target.id.clone(), position).is_some() {
                return Err(RouteError::DuplicateTarget {
                    target_id: target.id.clone(),
                });
            }
            total_weight += u64::from(target.weight);
            cumulative.push(total_weight);
        }

        if total_weight == 0 {
            return Err(RouteError::ZeroTotalWeight);
        }

        Ok(Self {
            targets: targets.into_iter().map(Arc::new).collect(),
            index,
            cumulative,
            total_weight,
        })
    }

    /// Every configured target, in configuration order.
    pub fn all_valid_targets(&self) -> Vec<Arc<ExecutionTarget>> {
        self.targets.clone()
    }

    /// Exact-match lookup by target id.
    pub fn lookup(&self, id: &str) -> RouteResult<&Arc<ExecutionTarget>> {
        self.index
            .get(id)
            .map(|&position| &self.targets[position])
            .ok_or_else(|| RouteError::target_not_found(id))
    }

    /// Map a routing hash onto the target owning `hash % total_weight`.
    ///
    /// Returns `None` only when the total weight is zero, which weighted
    /// registries rule out at construction.
    pub fn bucket(&self, hash: u64) -> Option<&Arc<ExecutionTarget>> {
        if self.total_weight == 0 {
            return None;
        }
        let point = hash % self.total_weight;
        let position = self.cumulative.partition_point(|&upper| upper <= point);
        self.targets.get(position)
    }

    /// Sum of all target weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Fraction of auto-routed traffic a target is configured to receive.
    pub fn weight_share(&self, id: &str) -> Option<f64> {
        if self.total_weight == 0 {
            return None;
        }
        let target = self.lookup(id).ok()?;
        Some(f64::from(target.weight) / self.total_weight as f64)
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if the registry holds no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
