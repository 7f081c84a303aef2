//! # Core Entities
//!
//! Byte-level identifiers used across subsystems.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Length in bytes of an [`Identity`].
pub const IDENTITY_LENGTH: usize = 20;

/// Decentralised identity of an account or collaborator.
///
/// Identities are 20-byte ledger addresses; key material behind them is
/// resolved through an identity resolver, never carried here.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Identity(pub [u8; IDENTITY_LENGTH]);

impl Identity {
    /// Build an identity from a byte slice of exactly [`IDENTITY_LENGTH`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; IDENTITY_LENGTH] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTITY_LENGTH] {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({self})")
    }
}
