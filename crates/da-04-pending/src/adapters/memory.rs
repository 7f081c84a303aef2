//! In-memory pending repository.

use crate::domain::errors::RepositoryError;
use crate::ports::outbound::PendingRepository;
use async_trait::async_trait;
use da_01_document_model::{DocumentIdentifier, DocumentModel};
use parking_lot::RwLock;
use shared_types::Identity;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

type Key = (Identity, DocumentIdentifier);

#[derive(Default)]
pub struct InMemoryPendingRepository {
    records: RwLock<HashMap<Key, Box<dyn DocumentModel>>>,
}

impl InMemoryPendingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PendingRepository for InMemoryPendingRepository {
    async fn get(
        &self,
        account: &Identity,
        id: &DocumentIdentifier,
    ) -> Result<Box<dyn DocumentModel>, RepositoryError> {
        self.records
            .read()
            .get(&(*account, *id))
            .cloned()
            .ok_or(RepositoryError::NotFound {
                account: *account,
                document: *id,
            })
    }

    async fn create(
        &self,
        account: &Identity,
        id: &DocumentIdentifier,
        document: Box<dyn DocumentModel>,
    ) -> Result<(), RepositoryError> {
        match self.records.write().entry((*account, *id)) {
            Entry::Occupied(_) => Err(RepositoryError::AlreadyExists {
                account: *account,
                document: *id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(())
            }
        }
    }

    async fn update(
        &self,
        account: &Identity,
        id: &DocumentIdentifier,
        document: Box<dyn DocumentModel>,
    ) -> Result<(), RepositoryError> {
        match self.records.write().get_mut(&(*account, *id)) {
            Some(slot) => {
                *slot = document;
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                account: *account,
                document: *id,
            }),
        }
    }

    async fn delete(&self, account: &Identity, id: &DocumentIdentifier) -> Result<(), RepositoryError> {
        self.records
            .write()
            .remove(&(*account, *id))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound {
                account: *account,
                document: *id,
            })
    }
}
