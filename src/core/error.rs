//! Error types and status mapping.
//!
//! Routing errors fall into two families. Misconfiguration errors are raised
//! while building a registry and are fatal at startup. Request errors are
//! raised by target selection and are terminal for the request: the selector
//! never retries and never produces partial results.

use thiserror::Error;

/// Errors raised while building or querying the execution cluster selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Two configured targets share the same id.
    #[error("duplicate execution target id: {target_id}")]
    DuplicateTarget { target_id: String },

    /// Multi-target mode configured with weights summing to zero.
    #[error("total weight of execution targets must be > 0")]
    ZeroTotalWeight,

    /// Multi-target mode configured with no enabled targets.
    #[error("no execution targets configured")]
    NoTargets,

    /// Local mode configured with more than one enabled target.
    #[error("local execution mode supports a single target, got {count}")]
    TooManyLocalTargets { count: usize },

    /// Structurally invalid target configuration.
    #[error("invalid execution config: {message}")]
    InvalidConfig { message: String },

    /// An explicit target was requested from a local-only deployment.
    #[error("remote target {target_id} is not supported")]
    UnsupportedTarget { target_id: String },

    /// An explicit target id is unknown to the registry.
    #[error("execution target {target_id} not found")]
    TargetNotFound { target_id: String },

    /// The task type is whitelisted and the entity is outside its scopes.
    #[error("task type {task_type} is not whitelisted")]
    TaskTypeNotAllowed { task_type: String },

    /// Shard bucketing requested with zero shards.
    #[error("shard count must be > 0")]
    InvalidShardCount,
}

impl RouteError {
    /// Create an UnsupportedTarget error.
    pub fn unsupported_target(target_id: impl Into<String>) -> Self {
        Self::UnsupportedTarget {
            target_id: target_id.into(),
        }
    }

    /// Create a TargetNotFound error.
    pub fn target_not_found(target_id: impl Into<String>) -> Self {
        Self::TargetNotFound {
            target_id: target_id.into(),
        }
    }

    /// Create a TaskTypeNotAllowed error.
    pub fn task_type_not_allowed(task_type: impl Into<String>) -> Self {
        Self::TaskTypeNotAllowed {
            task_type: task_type.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Selection is pure, so no routing error is ever worth retrying as-is.
    pub fn is_retriable(&self) -> bool {
        false
    }

    /// Check if this error should stop the process at startup.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTarget { .. }
                | Self::ZeroTotalWeight
                | Self::NoTargets
                | Self::TooManyLocalTargets { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Check if this error was caused by the caller's request.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedTarget { .. }
                | Self::TargetNotFound { .. }
                | Self::TaskTypeNotAllowed { .. }
                | Self::InvalidShardCount
        )
    }

    /// The target id the caller asked for, if this error concerns one.
    pub fn requested_target(&self) -> Option<&str> {
        match self {
            Self::UnsupportedTarget { target_id } | Self::TargetNotFound { target_id } => {
                Some(target_id)
            }
            _ => None,
        }
    }
}

/// Result type using RouteError.
pub type RouteResult<T> = Result<T, RouteError>;

// ============================================================================
// Status mapping for the request-handling layer
// ============================================================================

/// gRPC status codes used by the admin service handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrpcCode {
    InvalidArgument = 3,
    NotFound = 5,
    FailedPrecondition = 9,
    Internal = 13,
}

/// Maps routing errors onto the status codes surfaced to end users.
pub struct StatusMapping;

impl StatusMapping {
    /// Map a RouteError to a gRPC status code.
    pub fn to_grpc_code(error: &RouteError) -> GrpcCode {
        match error {
            RouteError::UnsupportedTarget { .. } => GrpcCode::InvalidArgument,
            RouteError::TaskTypeNotAllowed { .. } | RouteError::InvalidShardCount => {
                GrpcCode::InvalidArgument
            }
            RouteError::TargetNotFound { .. } => GrpcCode::NotFound,
            RouteError::NoTargets | RouteError::ZeroTotalWeight => GrpcCode::FailedPrecondition,
            RouteError::DuplicateTarget { .. }
            | RouteError::TooManyLocalTargets { .. }
            | RouteError::InvalidConfig { .. } => GrpcCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_target_message_embeds_id() {
        let err = RouteError::unsupported_target("t1");
        assert_eq!(err.to_string(), "remote target t1 is not supported");
        assert_eq!(err.requested_target(), Some("t1"));
    }

    #[test]
    fn request_errors_are_terminal() {
        let errors = [
            RouteError::unsupported_target("a"),
            RouteError::target_not_found("b"),
        ];
        for err in &errors {
            assert!(err.is_request_error());
            assert!(!err.is_misconfiguration());
            assert!(!err.is_retriable());
        }
    }

    #[test]
    fn misconfiguration_maps_to_internal_or_precondition() {
        assert_eq!(
            StatusMapping::to_grpc_code(&RouteError::DuplicateTarget {
                target_id: "x".into()
            }),
            GrpcCode::Internal
        );
        assert_eq!(
            StatusMapping::to_grpc_code(&RouteError::ZeroTotalWeight),
            GrpcCode::FailedPrecondition
        );
        assert_eq!(
            StatusMapping::to_grpc_code(&RouteError::target_not_found("x")),
            GrpcCode::NotFound
        );
    }
}
