//! Task type whitelist.
//!
//! Restricts which projects and domains may run a given task type. Task types
//! absent from the whitelist are unrestricted. A listed task type is allowed
//! when any of its scopes matches the identifier:
//!
//! ```text
//! { project = "" }                       every project
//! { project = "p" }                      every domain of project p
//! { project = "p", domain = "d" }        only p/d
//! ```
//!
//! The whitelist is a plain value loaded with the rest of the configuration
//! and swapped with it on reload. An absent `[task_type_whitelist]` section is
//! an empty whitelist.

use crate::control::identifier::NamedEntityIdentifier;
use crate::core::error::{RouteError, RouteResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A project (and optionally domain) a task type is allowed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistScope {
    /// Empty matches every project.
    #[serde(default)]
    pub project: String,

    /// Empty matches every domain of `project`.
    #[serde(default)]
    pub domain: String,
}

impl WhitelistScope {
    pub fn new(project: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            domain: domain.into(),
        }
    }

    fn matches(&self, identifier: &NamedEntityIdentifier) -> bool {
        if self.project.is_empty() {
            return true;
        }
        self.project == identifier.project
            && (self.domain.is_empty() || self.domain == identifier.domain)
    }
}

/// Task type to the scopes it is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTypeWhitelist {
    entries: BTreeMap<String, Vec<WhitelistScope>>,
}

impl TaskTypeWhitelist {
    /// Create an empty whitelist, which allows every task type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `task_type` to `scopes`, replacing any earlier entry.
    pub fn with_entry(
        mut self,
        task_type: impl Into<String>,
        scopes: impl IntoIterator<Item = WhitelistScope>,
    ) -> Self {
        self.entries.insert(task_type.into(), scopes.into_iter().collect());
        self
    }

    /// Check whether `task_type` may run for `identifier`.
    pub fn is_allowed(&self, task_type: &str, identifier: &NamedEntityIdentifier) -> bool {
        match self.entries.get(task_type) {
            None => true,
            Some(scopes) => scopes.iter().any(|scope| scope.matches(identifier)),
        }
    }

    /// Like [`is_allowed`](Self::is_allowed), but as a request error.
    pub fn check(&self, task_type: &str, identifier: &NamedEntityIdentifier) -> RouteResult<()> {
        if self.is_allowed(task_type, identifier) {
            Ok(())
        } else {
            Err(RouteError::task_type_not_allowed(task_type))
        }
    }

    /// Scopes configured for `task_type`, if it is restricted.
    pub fn scopes(&self, task_type: &str) -> Option<&[WhitelistScope]> {
        self.entries.get(task_type).map(Vec::as_slice)
    }

    /// Number of restricted task types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(project: &str, domain: &str) -> NamedEntityIdentifier {
        NamedEntityIdentifier::new(project, domain, "task")
    }

    fn whitelist() -> TaskTypeWhitelist {
        TaskTypeWhitelist::new()
            .with_entry(
                "spark",
                [
                    WhitelistScope::new("analytics", "production"),
                    WhitelistScope::new("research", ""),
                ],
            )
            .with_entry("sidecar", [WhitelistScope::default()])
            .with_entry("hive", Vec::new())
    }

    #[test]
    fn empty_whitelist_allows_everything() {
        let whitelist = TaskTypeWhitelist::new();
        assert!(whitelist.is_empty());
        assert!(whitelist.is_allowed("spark", &id("p", "d")));
        assert_eq!(whitelist.check("spark", &id("p", "d")), Ok(()));
    }

    #[test]
    fn unlisted_task_type_is_unrestricted() {
        assert!(whitelist().is_allowed("python", &id("anything", "dev")));
    }

    #[test]
    fn project_and_domain_scope() {
        let whitelist = whitelist();
        assert!(whitelist.is_allowed("spark", &id("analytics", "production")));
        assert!(!whitelist.is_allowed("spark", &id("analytics", "development")));
        assert!(!whitelist.is_allowed("spark", &id("other", "production")));
    }

    #[test]
    fn project_scope_covers_every_domain() {
        let whitelist = whitelist();
        assert!(whitelist.is_allowed("spark", &id("research", "development")));
        assert!(whitelist.is_allowed("spark", &id("research", "production")));
    }

    #[test]
    fn empty_project_scope_covers_every_project() {
        assert!(whitelist().is_allowed("sidecar", &id("anyone", "anywhere")));
    }

    #[test]
    fn listed_task_type_without_scopes_is_denied() {
        let err = whitelist().check("hive", &id("analytics", "production")).unwrap_err();
        assert_eq!(err, RouteError::task_type_not_allowed("hive"));
        assert!(err.is_request_error());
    }

    #[test]
    fn parses_from_toml_table() {
        let whitelist: TaskTypeWhitelist = toml::from_str(
            r#"
spark = [{ project = "analytics", domain = "production" }]

[[sidecar]]
project = "research"
"#,
        )
        .unwrap();
        assert_eq!(whitelist.len(), 2);
        assert_eq!(
            whitelist.scopes("sidecar"),
            Some(&[WhitelistScope::new("research", "")][..])
        );
        assert!(whitelist.is_allowed("sidecar", &id("research", "staging")));
    }
}
