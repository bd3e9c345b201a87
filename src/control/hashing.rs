//! Stable identifier hashing.
//!
//! Identifiers are hashed over the UTF-8 bytes of `project:domain:name`:
//!
//! - [`HashVersion::V1`] (default): FNV-1 64-bit.
//! - [`HashVersion::V2`]: xxHash64 with seed 0.
//!
//! The numeric output is part of the routing contract. Sharding layers that
//! bucket scheduled jobs reuse it, so changing the version reroutes traffic
//! and must be an explicit configuration change.

use crate::control::identifier::NamedEntityIdentifier;
use crate::core::error::{RouteError, RouteResult};
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use twox_hash::XxHash64;

const FIELD_DELIMITER: &[u8] = b":";

const FNV1_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV1_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash algorithm version used for routing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashVersion {
    /// FNV-1 64-bit.
    #[default]
    V1,
    /// xxHash64, seed 0.
    V2,
}

impl std::fmt::Display for HashVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

impl std::str::FromStr for HashVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(format!("unknown hash version '{}', expected v1 or v2", other)),
        }
    }
}

/// FNV-1 64-bit hasher (multiply, then xor).
#[derive(Debug, Clone, Copy)]
pub struct Fnv1Hasher(u64);

impl Default for Fnv1Hasher {
    fn default() -> Self {
        Self(FNV1_OFFSET_BASIS)
    }
}

impl Hasher for Fnv1Hasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = self.0.wrapping_mul(FNV1_PRIME);
            self.0 ^= u64::from(*byte);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

fn write_identifier<H: Hasher>(hasher: &mut H, identifier: &NamedEntityIdentifier) {
    // Raw bytes only: `Hash` impls would mix in length prefixes.
    hasher.write(identifier.project.as_bytes());
    hasher.write(FIELD_DELIMITER);
    hasher.write(identifier.domain.as_bytes());
    hasher.write(FIELD_DELIMITER);
    hasher.write(identifier.name.as_bytes());
}

/// Hash an identifier with the default algorithm version.
pub fn hash_identifier(identifier: &NamedEntityIdentifier) -> u64 {
    compute_routing_hash(identifier, HashVersion::default())
}

/// Hash an identifier with an explicit algorithm version.
pub fn compute_routing_hash(identifier: &NamedEntityIdentifier, version: HashVersion) -> u64 {
    match version {
        HashVersion::V1 => {
            let mut hasher = Fnv1Hasher::default();
            write_identifier(&mut hasher, identifier);
            hasher.finish()
        }
        HashVersion::V2 => {
            let mut hasher = XxHash64::with_seed(0);
            write_identifier(&mut hasher, identifier);
            hasher.finish()
        }
    }
}

/// Compute the shard bucket for an identifier.
pub fn shard_index(
    identifier: &NamedEntityIdentifier,
    shard_count: u32,
    version: HashVersion,
) -> RouteResult<u32> {
    if shard_count == 0 {
        return Err(RouteError::InvalidShardCount);
    }
    let hash = compute_routing_hash(identifier, version);
    Ok((hash % u64::from(shard_count)) as u32)
}
