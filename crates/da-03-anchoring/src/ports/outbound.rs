//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the anchoring subsystem depends on. Each has an in-memory
//! adapter in `crate::adapters`.

use crate::domain::errors::{StoreError, TransportError};
use crate::domain::ledger::{AnchorCommit, LedgerAnchor, LedgerError, TxHandle};
use async_trait::async_trait;
use da_01_document_model::{DocumentIdentifier, DocumentModel, Signature};
use shared_types::Identity;

/// Contract calls on the anchoring ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Cheap probe used when connecting.
    async fn chain_id(&self) -> Result<u64, LedgerError>;

    /// Record `commit` from `account`.
    ///
    /// # Errors
    /// * `LedgerError::Underpriced` / `LedgerError::NonceTooLow` - raced by
    ///   another transaction from the same account; retryable
    async fn commit_anchor(&self, account: &str, commit: &AnchorCommit) -> Result<TxHandle, LedgerError>;

    /// The anchor recorded under `anchor_id`, if any.
    async fn find_anchor(&self, anchor_id: &DocumentIdentifier) -> Result<Option<LedgerAnchor>, LedgerError>;
}

/// Store of committed document versions, keyed by version identifier.
///
/// A version may be rewritten until it is stored as anchored; anchored
/// versions are immutable.
#[async_trait]
pub trait CommittedDocumentStore: Send + Sync {
    /// Write a version.
    ///
    /// # Errors
    /// * `StoreError::AlreadyAnchored` - the version is already anchored
    async fn put(&self, document: Box<dyn DocumentModel>) -> Result<(), StoreError>;

    /// Read a version by its version identifier.
    async fn get(&self, version: &DocumentIdentifier) -> Result<Box<dyn DocumentModel>, StoreError>;

    /// Latest anchored version of the document with root `root`.
    async fn latest(&self, root: &DocumentIdentifier) -> Result<Box<dyn DocumentModel>, StoreError>;
}

/// Document sent to a collaborator.
#[derive(Clone, Debug)]
pub struct Envelope {
    pub sender: Identity,
    pub document: Box<dyn DocumentModel>,
}

/// Peer-to-peer transport between collaborators.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver an envelope to the peer at `address`.
    async fn send(&self, address: &str, envelope: Envelope) -> Result<(), TransportError>;

    /// Ask the peer at `address` to sign the document's signing root.
    async fn request_signature(
        &self,
        address: &str,
        document: &dyn DocumentModel,
    ) -> Result<Signature, TransportError>;
}
