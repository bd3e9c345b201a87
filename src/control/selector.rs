//! Execution cluster selection.
//!
//! Two strategies share the [`ExecutionCluster`] capability:
//!
//! - [`LocalCluster`] serves every request from the one cluster it knows and
//!   rejects explicit requests for any other target.
//! - [`WeightedCluster`] honours explicit targets by lookup and otherwise
//!   hashes the identifier into the registry's cumulative-weight ranges.
//!
//! [`ClusterSelector`] picks one of them once, from configuration. Selection
//! is synchronous, performs no I/O, and is a deterministic function of the
//! identifier, the spec and the registry.

use crate::control::hashing::{compute_routing_hash, HashVersion};
use crate::control::identifier::NamedEntityIdentifier;
use crate::control::registry::TargetRegistry;
use crate::control::target::{requested_id, ExecutionTarget, ExecutionTargetSpec};
use crate::core::config::{ExecutionConfig, ExecutionMode};
use crate::core::error::{RouteError, RouteResult};
use std::collections::HashSet;
use std::sync::Arc;

/// Capabilities exposed to the dispatch layer.
pub trait ExecutionCluster: Send + Sync {
    /// Resolve a routing request to exactly one target.
    fn get_target(
        &self,
        identifier: &NamedEntityIdentifier,
        spec: Option<&ExecutionTargetSpec>,
    ) -> RouteResult<Arc<ExecutionTarget>>;

    /// Every target this selector can route to, in configuration order.
    fn all_valid_targets(&self) -> Vec<Arc<ExecutionTarget>>;
}

/// Single-cluster strategy.
#[derive(Debug, Clone)]
pub struct LocalCluster {
    target: Arc<ExecutionTarget>,
    registry: TargetRegistry,
}

impl LocalCluster {
    /// Create a local selector serving `target`.
    pub fn new(target: ExecutionTarget) -> Self {
        let target = Arc::new(target);
        Self {
            registry: TargetRegistry::single(Arc::clone(&target)),
            target,
        }
    }

    /// Local selector for the cluster the control plane runs in.
    pub fn in_cluster() -> Self {
        Self::new(ExecutionTarget::in_cluster())
    }

    /// The sole target.
    pub fn target(&self) -> &Arc<ExecutionTarget> {
        &self.target
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }
}

impl ExecutionCluster for LocalCluster {
    fn get_target(
        &self,
        _identifier: &NamedEntityIdentifier,
        spec: Option<&ExecutionTargetSpec>,
    ) -> RouteResult<Arc<ExecutionTarget>> {
        let target = self.target();
        match requested_id(spec) {
            Some(id) if id != target.id => Err(RouteError::unsupported_target(id)),
            _ => Ok(Arc::clone(target)),
        }
    }

    fn all_valid_targets(&self) -> Vec<Arc<ExecutionTarget>> {
        self.registry.all_valid_targets()
    }
}

/// Multi-cluster strategy using weighted hash bucketing.
#[derive(Debug, Clone)]
pub struct WeightedCluster {
    registry: TargetRegistry,
    hash_version: HashVersion,
}

impl WeightedCluster {
    /// Create a weighted selector over a validated registry.
    pub fn new(registry: TargetRegistry, hash_version: HashVersion) -> Self {
        Self {
            registry,
            hash_version,
        }
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn hash_version(&self) -> HashVersion {
        self.hash_version
    }

    fn auto_route(&self, identifier: &NamedEntityIdentifier) -> RouteResult<Arc<ExecutionTarget>> {
        let hash = compute_routing_hash(identifier, self.hash_version);
        let target = self
            .registry
            .bucket(hash)
            .ok_or(RouteError::ZeroTotalWeight)?;

        tracing::debug!(
            identifier = %identifier,
            target_id = %target.id,
            hash,
            "auto-routed execution"
        );
        Ok(Arc::clone(target))
    }
}

impl ExecutionCluster for WeightedCluster {
    fn get_target(
        &self,
        identifier: &NamedEntityIdentifier,
        spec: Option<&ExecutionTargetSpec>,
    ) -> RouteResult<Arc<ExecutionTarget>> {
        match requested_id(spec) {
            Some(id) => self.registry.lookup(id).map(Arc::clone),
            None => self.auto_route(identifier),
        }
    }

    fn all_valid_targets(&self) -> Vec<Arc<ExecutionTarget>> {
        self.registry.all_valid_targets()
    }
}

/// The selector strategy chosen at startup.
#[derive(Debug, Clone)]
pub enum ClusterSelector {
    Local(LocalCluster),
    Weighted(WeightedCluster),
}

impl ClusterSelector {
    /// Build a selector from the execution section of the configuration.
    ///
    /// Ids must be unique across every configured target, disabled ones
    /// included. Disabled targets are then dropped. In `auto` mode zero or one
    /// remaining target selects the local strategy and two or more select the
    /// weighted one.
    pub fn from_config(config: &ExecutionConfig, hash_version: HashVersion) -> RouteResult<Self> {
        let mut seen = HashSet::with_capacity(config.targets.len());
        if let Some(duplicate) = config.targets.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(RouteError::DuplicateTarget {
                target_id: duplicate.id.clone(),
            });
        }

        let targets: Vec<ExecutionTarget> = config
            .targets
            .iter()
            .filter(|t| t.enabled)
            .map(|t| ExecutionTarget::new(t.id.clone(), t.connection.clone(), t.weight))
            .collect();

        let selector = match config.mode {
            ExecutionMode::Local => Self::local(targets)?,
            ExecutionMode::Multi => Self::weighted(targets, hash_version)?,
            ExecutionMode::Auto if targets.len() <= 1 => Self::local(targets)?,
            ExecutionMode::Auto => Self::weighted(targets, hash_version)?,
        };

        tracing::info!(
            mode = %selector.mode(),
            targets = selector.registry().len(),
            total_weight = selector.registry().total_weight(),
            %hash_version,
            "execution cluster selector built"
        );
        Ok(selector)
    }

    fn local(mut targets: Vec<ExecutionTarget>) -> RouteResult<Self> {
        match targets.len() {
            0 => Ok(Self::Local(LocalCluster::in_cluster())),
            1 => Ok(Self::Local(LocalCluster::new(targets.remove(0)))),
            count => Err(RouteError::TooManyLocalTargets { count }),
        }
    }

    fn weighted(targets: Vec<ExecutionTarget>, hash_version: HashVersion) -> RouteResult<Self> {
        let registry = TargetRegistry::weighted(targets)?;
        Ok(Self::Weighted(WeightedCluster::new(registry, hash_version)))
    }

    /// The resolved operating mode; never `Auto`.
    pub fn mode(&self) -> ExecutionMode {
        match self {
            Self::Local(_) => ExecutionMode::Local,
            Self::Weighted(_) => ExecutionMode::Multi,
        }
    }

    /// The registry backing the selector.
    pub fn registry(&self) -> &TargetRegistry {
        match self {
            Self::Local(local) => local.registry(),
            Self::Weighted(weighted) => weighted.registry(),
        }
    }
}

impl ExecutionCluster for ClusterSelector {
    fn get_target(
        &self,
        identifier: &NamedEntityIdentifier,
        spec: Option<&ExecutionTargetSpec>,
    ) -> RouteResult<Arc<ExecutionTarget>> {
        match self {
            Self::Local(local) => local.get_target(identifier, spec),
            Self::Weighted(weighted) => weighted.get_target(identifier, spec),
        }
    }

    fn all_valid_targets(&self) -> Vec<Arc<ExecutionTarget>> {
        match self {
            Self::Local(local) => local.all_valid_targets(),
            Self::Weighted(weighted) => weighted.all_valid_targets(),
        }
    }
}
