//! # Root Calculation
//!
//! Signing root: SHA-256 over the sorted leaf hashes of a document's
//! `(field name, value)` pairs, so field order never changes the root.
//!
//! Document root: SHA-256 over the signing root followed by the sorted
//! signature leaves. Signature append order is kept for audit but does not
//! affect the root.

use da_01_document_model::Signature;
use shared_crypto::{sha256, Sha256Hasher};
use shared_types::Hash;

fn field_leaf(name: &str, value: &[u8]) -> Hash {
    let mut hasher = Sha256Hasher::new();
    hasher.update_framed(name.as_bytes()).update_framed(value);
    hasher.finalize()
}

fn combine(prefix: Option<&Hash>, mut leaves: Vec<Hash>) -> Hash {
    leaves.sort_unstable();
    let mut hasher = Sha256Hasher::new();
    if let Some(prefix) = prefix {
        hasher.update(prefix);
    }
    for leaf in &leaves {
        hasher.update(leaf);
    }
    hasher.finalize()
}

/// Root over a document's signing fields.
pub fn signing_root(fields: &[(String, Vec<u8>)]) -> Hash {
    let leaves = fields
        .iter()
        .map(|(name, value)| field_leaf(name, value))
        .collect();
    combine(None, leaves)
}

/// Root binding a signing root to the signatures collected over it.
pub fn document_root(signing_root: &Hash, signatures: &[Signature]) -> Hash {
    let leaves = signatures
        .iter()
        .map(|s| sha256(&s.canonical_bytes()))
        .collect();
    combine(Some(signing_root), leaves)
}
