//! # Identifier & Version Model
//!
//! A document is identified by an immutable root identifier and a chain of
//! version identifiers. Each new version's `current` is the previous
//! version's `next`, so the identifier of the upcoming version is known (and
//! signed over) before it exists.

use crate::domain::errors::{DocumentError, DocumentResult};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of every document and version identifier.
pub const IDENTIFIER_LENGTH: usize = 32;

/// Document or version identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentIdentifier(pub [u8; IDENTIFIER_LENGTH]);

impl DocumentIdentifier {
    /// Fresh identifier from the OS CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; IDENTIFIER_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parse from a slice of exactly [`IDENTIFIER_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> DocumentResult<Self> {
        let arr: [u8; IDENTIFIER_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| DocumentError::InvalidIdentifier {
                    expected: IDENTIFIER_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LENGTH] {
        &self.0
    }
}

impl fmt::Display for DocumentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for DocumentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentIdentifier({self})")
    }
}

/// Root, previous, current and next identifiers of one document version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionChain {
    root: DocumentIdentifier,
    previous: Option<DocumentIdentifier>,
    current: DocumentIdentifier,
    next: DocumentIdentifier,
}

impl VersionChain {
    /// Chain for a brand-new document. The first version shares its
    /// identifier with the root.
    pub fn new() -> Self {
        let root = DocumentIdentifier::random();
        Self {
            root,
            previous: None,
            current: root,
            next: fresh_excluding(&[root]),
        }
    }

    /// Chain of the version after this one.
    pub fn derive_next(&self) -> Self {
        Self {
            root: self.root,
            previous: Some(self.current),
            current: self.next,
            next: fresh_excluding(&[self.root, self.current, self.next]),
        }
    }

    /// Immutable document identifier.
    pub fn root(&self) -> DocumentIdentifier {
        self.root
    }

    /// Version this one was derived from.
    pub fn previous(&self) -> Option<DocumentIdentifier> {
        self.previous
    }

    /// Identifier of this version.
    pub fn current(&self) -> DocumentIdentifier {
        self.current
    }

    /// Identifier reserved for the next version.
    pub fn next(&self) -> DocumentIdentifier {
        self.next
    }

    /// True when `id` names this document (root, latest lookup) or exactly
    /// this version (historical lookup).
    pub fn matches(&self, id: &DocumentIdentifier) -> bool {
        *id == self.root || *id == self.current
    }
}

impl Default for VersionChain {
    fn default() -> Self {
        Self::new()
    }
}

fn fresh_excluding(taken: &[DocumentIdentifier]) -> DocumentIdentifier {
    loop {
        let id = DocumentIdentifier::random();
        if !taken.contains(&id) {
            return id;
        }
    }
}
