//! Common test utilities.
//!
//! This module contains shared helpers for integration tests.
//! Import with `mod common;` in test files.

#![allow(dead_code)]

use fleetroute::control::identifier::NamedEntityIdentifier;
use fleetroute::control::target::ConnectionConfig;
use fleetroute::core::config::{ExecutionConfig, ExecutionMode, TargetConfig};
use std::io::Write;
use tempfile::NamedTempFile;

/// Three weighted targets: west (3), east (1), south (0).
pub const FLEET_CONFIG: &str = r#"
[execution]
mode = "multi"

[[execution.targets]]
id = "west"
weight = 3
[execution.targets.connection]
endpoint = "https://west.k8s.internal:6443"
[execution.targets.connection.auth]
type = "file_path"
token_path = "/var/run/credentials/west/token"
cert_path = "/var/run/credentials/west/cacert"

[[execution.targets]]
id = "east"
weight = 1
[execution.targets.connection]
endpoint = "https://east.k8s.internal:6443"

[[execution.targets]]
id = "south"
weight = 0
"#;

/// Write `content` to a temp file.
pub fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

/// Overwrite an existing temp config file.
pub fn rewrite_config(file: &NamedTempFile, content: &str) {
    std::fs::write(file.path(), content).expect("Failed to rewrite config");
}

/// Build a target config entry.
pub fn target(id: &str, weight: u32) -> TargetConfig {
    TargetConfig {
        id: id.to_string(),
        weight,
        enabled: true,
        connection: ConnectionConfig::default(),
    }
}

/// Build an execution section from `(id, weight)` pairs.
pub fn execution(mode: ExecutionMode, targets: &[(&str, u32)]) -> ExecutionConfig {
    ExecutionConfig {
        mode,
        targets: targets.iter().map(|(id, w)| target(id, *w)).collect(),
    }
}

/// Distinct identifiers for distribution tests.
pub fn identifiers(count: usize) -> Vec<NamedEntityIdentifier> {
    (0..count)
        .map(|i| {
            NamedEntityIdentifier::new(
                format!("project-{}", i % 7),
                ["development", "staging", "production"][i % 3],
                format!("workflow-{}", i),
            )
        })
        .collect()
}
