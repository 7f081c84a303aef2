//! In-memory peer transport.
//!
//! Peers are registered with their signing identity so signature requests
//! can be answered locally.

use crate::domain::errors::TransportError;
use crate::ports::outbound::{Envelope, Transport};
use async_trait::async_trait;
use da_01_document_model::{DocumentModel, Signature};
use da_02_signatures::{sign, IdentityConfig};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Default)]
pub struct InMemoryTransport {
    peers: RwLock<HashMap<String, Arc<IdentityConfig>>>,
    unreachable: RwLock<HashSet<String>>,
    delivered: RwLock<Vec<(String, Envelope)>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the peer reachable at `address`.
    pub fn register_peer(&self, address: &str, identity: Arc<IdentityConfig>) {
        self.peers.write().insert(address.to_string(), identity);
    }

    /// Make every call to `address` fail as unreachable.
    pub fn set_unreachable(&self, address: &str) {
        self.unreachable.write().insert(address.to_string());
    }

    /// Envelopes delivered so far, with their destination.
    pub fn delivered(&self) -> Vec<(String, Envelope)> {
        self.delivered.read().clone()
    }

    fn ensure_reachable(&self, address: &str) -> Result<(), TransportError> {
        if self.unreachable.read().contains(address) {
            return Err(TransportError::Unreachable(address.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, address: &str, envelope: Envelope) -> Result<(), TransportError> {
        self.ensure_reachable(address)?;
        self.delivered.write().push((address.to_string(), envelope));
        Ok(())
    }

    async fn request_signature(
        &self,
        address: &str,
        document: &dyn DocumentModel,
    ) -> Result<Signature, TransportError> {
        self.ensure_reachable(address)?;
        let rejected = |reason: &str| TransportError::Rejected {
            peer: address.to_string(),
            reason: reason.to_string(),
        };

        let peer = self
            .peers
            .read()
            .get(address)
            .cloned()
            .ok_or_else(|| rejected("unknown peer"))?;
        let root = document
            .core()
            .signing_root()
            .ok_or_else(|| rejected("no signing root"))?;
        Ok(sign(&peer, &root))
    }
}
