//! # Outbound Ports (Driven Ports)
//!
//! Identity resolution. Production deployments back this with the
//! identity registry contract; tests use the in-memory adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{Identity, PublicKey};
use thiserror::Error;

/// A signing key registered for an identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    pub public_key: PublicKey,
    pub valid_from: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl KeyRecord {
    /// Key was registered at or before `at` and not yet revoked.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && self.revoked_at.map_or(true, |revoked| at < revoked)
    }
}

/// Everything the resolver knows about one identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityRecord {
    pub identity: Identity,
    /// Peer address used by the transport to reach this identity.
    pub transport_address: String,
    pub keys: Vec<KeyRecord>,
}

/// Resolver failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("Identity not found: {0}")]
    NotFound(Identity),

    #[error("Resolver unavailable: {0}")]
    Unavailable(String),
}

/// Looks up identities and their key history.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve an identity.
    async fn lookup(&self, identity: &Identity) -> Result<IdentityRecord, ResolverError>;

    /// Whether `key` was a valid signing key for `identity` at `at`.
    async fn validate_key(
        &self,
        identity: &Identity,
        key: &PublicKey,
        at: DateTime<Utc>,
    ) -> Result<bool, ResolverError> {
        let record = self.lookup(identity).await?;
        Ok(record
            .keys
            .iter()
            .any(|k| k.public_key == *key && k.is_valid_at(at)))
    }
}
