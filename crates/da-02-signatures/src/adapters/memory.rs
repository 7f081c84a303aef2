//! In-memory identity resolver.

use crate::ports::outbound::{IdentityRecord, IdentityResolver, KeyRecord, ResolverError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use shared_types::{Identity, PublicKey};
use std::collections::HashMap;

/// Resolver backed by a map, for tests and single-node setups.
#[derive(Default)]
pub struct InMemoryIdentityResolver {
    records: RwLock<HashMap<Identity, IdentityRecord>>,
}

impl InMemoryIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity with one signing key.
    ///
    /// The key is backdated by a minute so signatures captured in the same
    /// instant as registration validate.
    pub fn register(&self, identity: Identity, transport_address: &str, key: PublicKey) {
        let record = IdentityRecord {
            identity,
            transport_address: transport_address.to_string(),
            keys: vec![KeyRecord {
                public_key: key,
                valid_from: Utc::now() - Duration::minutes(1),
                revoked_at: None,
            }],
        };
        self.records.write().insert(identity, record);
    }

    /// Add a key valid from `valid_from`. Returns false for unknown identities.
    pub fn add_key(&self, identity: &Identity, key: PublicKey, valid_from: DateTime<Utc>) -> bool {
        match self.records.write().get_mut(identity) {
            Some(record) => {
                record.keys.push(KeyRecord {
                    public_key: key,
                    valid_from,
                    revoked_at: None,
                });
                true
            }
            None => false,
        }
    }

    /// Revoke every registration of `key` for `identity` as of now.
    pub fn revoke_key(&self, identity: &Identity, key: &PublicKey) {
        let now = Utc::now();
        if let Some(record) = self.records.write().get_mut(identity) {
            record
                .keys
                .iter_mut()
                .filter(|k| k.public_key == *key && k.revoked_at.is_none())
                .for_each(|k| k.revoked_at = Some(now));
        }
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityResolver {
    async fn lookup(&self, identity: &Identity) -> Result<IdentityRecord, ResolverError> {
        self.records
            .read()
            .get(identity)
            .cloned()
            .ok_or(ResolverError::NotFound(*identity))
    }
}
