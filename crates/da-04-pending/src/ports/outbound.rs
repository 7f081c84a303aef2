//! # Outbound Ports (Driven Ports)

use crate::domain::errors::RepositoryError;
use async_trait::async_trait;
use da_01_document_model::{DocumentIdentifier, DocumentModel};
use shared_types::Identity;

/// Mutable store of pending documents, keyed by `(account, document id)`.
#[async_trait]
pub trait PendingRepository: Send + Sync {
    async fn get(
        &self,
        account: &Identity,
        id: &DocumentIdentifier,
    ) -> Result<Box<dyn DocumentModel>, RepositoryError>;

    /// Insert a new record.
    ///
    /// The existence check and the insert are one atomic step; of two
    /// concurrent creates for the same key exactly one succeeds.
    ///
    /// # Errors
    /// * `RepositoryError::AlreadyExists` - a record exists for the key
    async fn create(
        &self,
        account: &Identity,
        id: &DocumentIdentifier,
        document: Box<dyn DocumentModel>,
    ) -> Result<(), RepositoryError>;

    /// Replace an existing record.
    async fn update(
        &self,
        account: &Identity,
        id: &DocumentIdentifier,
        document: Box<dyn DocumentModel>,
    ) -> Result<(), RepositoryError>;

    async fn delete(&self, account: &Identity, id: &DocumentIdentifier) -> Result<(), RepositoryError>;
}
