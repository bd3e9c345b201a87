//! Execution targets and caller overrides.
//!
//! An [`ExecutionTarget`] is an addressable downstream cluster. Its
//! [`ConnectionConfig`] is carried through selection untouched; only the
//! dispatch layer interprets it.

use serde::{Deserialize, Serialize};

/// Authentication scheme used to reach a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No credentials.
    #[default]
    None,
    /// Token and CA certificate read from files.
    FilePath,
    /// Service-account credentials of the pod the control plane runs in.
    InCluster,
}

/// Credentials block for a cluster connection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(rename = "type", default)]
    pub auth_type: AuthType,

    /// Bearer token file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<String>,

    /// CA certificate file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<String>,
}

/// How the dispatch layer connects to a target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// API server endpoint. `None` means in-cluster configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Skip TLS verification (development only).
    #[serde(default)]
    pub insecure: bool,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl ConnectionConfig {
    /// Connection using the credentials of the cluster the process runs in.
    pub fn in_cluster() -> Self {
        Self {
            endpoint: None,
            insecure: false,
            auth: AuthConfig {
                auth_type: AuthType::InCluster,
                token_path: None,
                cert_path: None,
            },
        }
    }

    /// Check if this connection points at the local cluster.
    pub fn is_in_cluster(&self) -> bool {
        self.endpoint.is_none()
    }
}

/// An addressable cluster capable of running tasks and workflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTarget {
    /// Unique id within the registry.
    pub id: String,

    pub connection: ConnectionConfig,

    /// Share of auto-routed traffic.
    pub weight: u32,
}

impl ExecutionTarget {
    /// Create a new execution target.
    pub fn new(id: impl Into<String>, connection: ConnectionConfig, weight: u32) -> Self {
        Self {
            id: id.into(),
            connection,
            weight,
        }
    }

    /// The target used by local deployments that configure no clusters.
    ///
    /// Its id is the empty string, so no explicit override can ever match it.
    pub fn in_cluster() -> Self {
        Self::new("", ConnectionConfig::in_cluster(), 1)
    }
}

/// A caller-supplied request for a specific target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionTargetSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl ExecutionTargetSpec {
    /// Request a specific target by id.
    pub fn for_target(target_id: impl Into<String>) -> Self {
        Self {
            target_id: Some(target_id.into()),
        }
    }

    /// The requested id, or `None` when the caller wants auto-routing.
    ///
    /// An empty id is treated the same as an absent one.
    pub fn requested_id(&self) -> Option<&str> {
        self.target_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Resolve an optional spec to an explicit target id.
pub(crate) fn requested_id(spec: Option<&ExecutionTargetSpec>) -> Option<&str> {
    spec.and_then(ExecutionTargetSpec::requested_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_target_id_means_auto_route() {
        assert_eq!(requested_id(None), None);
        assert_eq!(requested_id(Some(&ExecutionTargetSpec::default())), None);
        assert_eq!(
            requested_id(Some(&ExecutionTargetSpec::for_target(""))),
            None
        );
        assert_eq!(
            requested_id(Some(&ExecutionTargetSpec::for_target("east"))),
            Some("east")
        );
    }

    #[test]
    fn in_cluster_target_has_empty_id() {
        let target = ExecutionTarget::in_cluster();
        assert!(target.id.is_empty());
        assert!(target.connection.is_in_cluster());
        assert_eq!(target.connection.auth.auth_type, AuthType::InCluster);
    }
}
