//! # Signature Entity
//!
//! A collaborator's detached signature over a document's signing root.
//! Producing and validating signatures is the job of the signatures crate;
//! the document only records them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::{Identity, PublicKey};

/// Signer identity, the key used, signature bytes and capture time.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub signer: Identity,
    pub public_key: PublicKey,
    #[serde_as(as = "Bytes")]
    pub bytes: [u8; 64],
    pub timestamp: DateTime<Utc>,
}

impl Signature {
    /// Stable byte encoding used when binding signatures into a root.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(20 + 32 + 64 + 8);
        out.extend_from_slice(self.signer.as_bytes());
        out.extend_from_slice(&self.public_key);
        out.extend_from_slice(&self.bytes);
        out.extend_from_slice(&self.timestamp.timestamp_micros().to_be_bytes());
        out
    }
}
