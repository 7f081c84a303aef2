//! # Identity Configuration
//!
//! The signing identity of an account or of this node.

use shared_crypto::Ed25519KeyPair;
use shared_types::{Identity, PublicKey};

/// An identity together with the key pair it signs with.
#[derive(Debug)]
pub struct IdentityConfig {
    pub identity: Identity,
    keys: Ed25519KeyPair,
}

impl IdentityConfig {
    pub fn new(identity: Identity, keys: Ed25519KeyPair) -> Self {
        Self { identity, keys }
    }

    /// Identity with a freshly generated key pair.
    pub fn generate(identity: Identity) -> Self {
        Self::new(identity, Ed25519KeyPair::generate())
    }

    /// Identity with a key pair derived from a 32-byte seed.
    pub fn from_seed(identity: Identity, seed: [u8; 32]) -> Self {
        Self::new(identity, Ed25519KeyPair::from_seed(seed))
    }

    /// Same key pair under a different identity.
    pub fn with_identity(self, identity: Identity) -> Self {
        Self { identity, ..self }
    }

    pub fn public_key(&self) -> PublicKey {
        *self.keys.public_key().as_bytes()
    }

    pub(crate) fn keys(&self) -> &Ed25519KeyPair {
        &self.keys
    }
}
