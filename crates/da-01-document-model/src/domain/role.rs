//! # Roles
//!
//! A role is a named set of collaborator identities and the unit of
//! authorization. Its key is derived from the label, so a label can only be
//! used once per document.

use crate::domain::errors::{DocumentError, DocumentResult};
use serde::{Deserialize, Serialize};
use shared_crypto::sha256;
use shared_types::Identity;
use std::collections::BTreeSet;
use std::fmt;

/// 32-byte role identifier (`sha256(label)`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleKey(pub [u8; 32]);

impl RoleKey {
    /// Derive the key for a role label.
    pub fn from_label(label: &str) -> Self {
        Self(sha256(label.as_bytes()))
    }

    /// Parse from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> DocumentResult<Self> {
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DocumentError::InvalidIdentifier {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoleKey({self})")
    }
}

/// A named collaborator set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub key: RoleKey,
    pub label: String,
    pub collaborators: BTreeSet<Identity>,
}

impl Role {
    pub fn new(label: &str, collaborators: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            key: RoleKey::from_label(label),
            label: label.to_string(),
            collaborators: collaborators.into_iter().collect(),
        }
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.collaborators.contains(identity)
    }
}
