//! Named entity identifiers.

use serde::{Deserialize, Serialize};

/// The `(project, domain, name)` triple naming a task or workflow.
///
/// Identifiers are transient: the request layer builds one per routing call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NamedEntityIdentifier {
    pub project: String,
    pub domain: String,
    pub name: String,
}

impl NamedEntityIdentifier {
    /// Create a new identifier.
    pub fn new(
        project: impl Into<String>,
        domain: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            domain: domain.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for NamedEntityIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.project, self.domain, self.name)
    }
}
