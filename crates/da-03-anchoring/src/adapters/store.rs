//! In-memory committed document store.

use crate::domain::errors::StoreError;
use crate::ports::outbound::CommittedDocumentStore;
use async_trait::async_trait;
use da_01_document_model::{DocumentIdentifier, DocumentModel, DocumentStatus};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    versions: HashMap<DocumentIdentifier, Box<dyn DocumentModel>>,
    /// Version identifiers per root, in write order
    history: HashMap<DocumentIdentifier, Vec<DocumentIdentifier>>,
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored versions.
    pub fn len(&self) -> usize {
        self.inner.read().versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CommittedDocumentStore for InMemoryDocumentStore {
    async fn put(&self, document: Box<dyn DocumentModel>) -> Result<(), StoreError> {
        let version = document.current_version();
        let root = document.id();
        let mut inner = self.inner.write();

        match inner.versions.get(&version) {
            Some(existing) if existing.status() == DocumentStatus::Anchored => {
                return Err(StoreError::AlreadyAnchored(version));
            }
            Some(_) => {}
            None => inner.history.entry(root).or_default().push(version),
        }
        inner.versions.insert(version, document);
        Ok(())
    }

    async fn get(&self, version: &DocumentIdentifier) -> Result<Box<dyn DocumentModel>, StoreError> {
        self.inner
            .read()
            .versions
            .get(version)
            .cloned()
            .ok_or(StoreError::NotFound(*version))
    }

    async fn latest(&self, root: &DocumentIdentifier) -> Result<Box<dyn DocumentModel>, StoreError> {
        let inner = self.inner.read();
        inner
            .history
            .get(root)
            .into_iter()
            .flatten()
            .rev()
            .filter_map(|version| inner.versions.get(version))
            .find(|doc| doc.status() == DocumentStatus::Anchored)
            .cloned()
            .ok_or(StoreError::NotFound(*root))
    }
}
