//! # Document Service
//!
//! Implements `DocumentServiceApi` over the committed store and the
//! anchoring pipeline.

use crate::domain::errors::{AnchorError, AnchorResult, StoreError};
use crate::ports::inbound::DocumentServiceApi;
use crate::ports::outbound::CommittedDocumentStore;
use crate::service::pipeline::{AnchorReceipt, AnchoringPipeline};
use async_trait::async_trait;
use da_01_document_model::{new_document, DocumentIdentifier, DocumentModel, UpdatePayload};
use da_02_signatures::IdentityConfig;
use shared_types::{Deadline, Identity};
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct DocumentService {
    store: Arc<dyn CommittedDocumentStore>,
    pipeline: AnchoringPipeline,
}

impl DocumentService {
    pub fn new(store: Arc<dyn CommittedDocumentStore>, pipeline: AnchoringPipeline) -> Self {
        Self { store, pipeline }
    }

    /// Apply `payload` to a freshly derived version.
    fn apply(
        document: &mut Box<dyn DocumentModel>,
        actor: &Identity,
        payload: &UpdatePayload,
    ) -> AnchorResult<()> {
        if document.patcher().is_some() {
            document.patch(actor, payload)?;
            return Ok(());
        }
        if !payload.create.fields.is_empty() {
            return Err(AnchorError::InvalidDocument(format!(
                "{} documents have no fields",
                document.kind()
            )));
        }
        let core = document.core_mut();
        core.add_collaborators(actor, &payload.create.collaborators)?;
        core.add_attributes(actor, payload.create.attributes.clone())?;
        Ok(())
    }
}

#[async_trait]
impl DocumentServiceApi for DocumentService {
    #[instrument(skip_all, fields(actor = %actor))]
    async fn derive(
        &self,
        deadline: &Deadline,
        actor: &Identity,
        payload: &UpdatePayload,
    ) -> AnchorResult<Box<dyn DocumentModel>> {
        let Some(root) = payload.document_id else {
            let document = new_document(*actor, &payload.create)?;
            debug!(document = %document.id(), "derived new document");
            return Ok(document);
        };

        let latest = deadline.run(self.store.latest(&root)).await??;
        if latest.kind() != payload.create.kind {
            return Err(AnchorError::InvalidDocument(format!(
                "document {} is a {}, not a {}",
                root,
                latest.kind(),
                payload.create.kind
            )));
        }

        let mut next = latest.derive_next_version();
        Self::apply(&mut next, actor, payload)?;
        debug!(document = %root, version = %next.current_version(), "derived next version");
        Ok(next)
    }

    async fn commit(
        &self,
        deadline: &Deadline,
        signer: &IdentityConfig,
        document: Box<dyn DocumentModel>,
    ) -> AnchorResult<AnchorReceipt> {
        self.pipeline.anchor(deadline, signer, document).await
    }

    async fn get_current_version(
        &self,
        deadline: &Deadline,
        root: &DocumentIdentifier,
    ) -> AnchorResult<Box<dyn DocumentModel>> {
        Ok(deadline.run(self.store.latest(root)).await??)
    }

    async fn get_version(
        &self,
        deadline: &Deadline,
        root: &DocumentIdentifier,
        version: &DocumentIdentifier,
    ) -> AnchorResult<Box<dyn DocumentModel>> {
        let document = deadline.run(self.store.get(version)).await??;
        if document.id() != *root {
            return Err(StoreError::NotFound(*version).into());
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryDocumentStore, InMemoryTransport, MockLedgerClient};
    use crate::service::connection::{LedgerConfig, LedgerConnection};
    use crate::service::pipeline::PipelineConfig;
    use crate::service::submitter::{SubmitterConfig, TransactionSubmitter};
    use da_01_document_model::{AttrValue, Attribute, CreatePayload, DocumentError, DocumentKind, DocumentStatus};
    use da_02_signatures::InMemoryIdentityResolver;

    async fn service() -> (DocumentService, Arc<IdentityConfig>) {
        let author = Arc::new(IdentityConfig::generate(Identity([1; 20])));
        let resolver = Arc::new(InMemoryIdentityResolver::new());
        resolver.register(author.identity, "author", author.public_key());

        let ledger = Arc::new(MockLedgerClient::new(1));
        let connection = LedgerConnection::connect(&LedgerConfig::default(), ledger)
            .await
            .unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = AnchoringPipeline::new(
            PipelineConfig::default(),
            resolver,
            store.clone(),
            Arc::new(InMemoryTransport::new()),
            Arc::new(connection),
            Arc::new(TransactionSubmitter::new(SubmitterConfig::default())),
        );
        (DocumentService::new(store, pipeline), author)
    }

    fn invoice(amount: &str) -> CreatePayload {
        CreatePayload::new(DocumentKind::Invoice).with_field("amount", amount)
    }

    #[tokio::test]
    async fn test_derive_twice_chains_versions() {
        let (service, author) = service().await;
        let deadline = Deadline::none();

        let v1 = service
            .derive(&deadline, &author.identity, &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        assert_eq!(v1.id(), v1.current_version());
        service.commit(&deadline, &author, v1.clone()).await.unwrap();

        let v2 = service
            .derive(
                &deadline,
                &author.identity,
                &UpdatePayload::for_document(v1.id(), invoice("120")),
            )
            .await
            .unwrap();
        assert_eq!(v2.id(), v1.id());
        assert_eq!(v2.current_version(), v1.next_version());
        assert_ne!(v2.next_version(), v1.next_version());
        assert_eq!(v2.status(), DocumentStatus::Draft);
        assert_eq!(v2.field("amount"), Some("120"));
    }

    #[tokio::test]
    async fn test_derive_requires_anchored_base() {
        let (service, author) = service().await;
        let root = DocumentIdentifier([5; 32]);
        let err = service
            .derive(
                &Deadline::none(),
                &author.identity,
                &UpdatePayload::for_document(root, invoice("1")),
            )
            .await
            .unwrap_err();
        assert_eq!(err, AnchorError::Store(StoreError::NotFound(root)));
    }

    #[tokio::test]
    async fn test_derive_generic_next_version_adds_attributes() {
        let (service, author) = service().await;
        let deadline = Deadline::none();
        let v1 = service
            .derive(
                &deadline,
                &author.identity,
                &UpdatePayload::new_document(CreatePayload::new(DocumentKind::Generic)),
            )
            .await
            .unwrap();
        service.commit(&deadline, &author, v1.clone()).await.unwrap();

        let attr = Attribute::new("reference", AttrValue::String("PO-7".into())).unwrap();
        let payload = UpdatePayload::for_document(
            v1.id(),
            CreatePayload::new(DocumentKind::Generic).with_attribute(attr.clone()),
        );
        let v2 = service.derive(&deadline, &author.identity, &payload).await.unwrap();
        assert_eq!(v2.core().attribute("reference"), Some(&attr));

        let outsider = Identity([7; 20]);
        let err = service.derive(&deadline, &outsider, &payload).await.unwrap_err();
        assert!(matches!(
            err,
            AnchorError::Document(DocumentError::Unauthorized { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_version_checks_root() {
        let (service, author) = service().await;
        let deadline = Deadline::none();
        let doc = service
            .derive(&deadline, &author.identity, &UpdatePayload::new_document(invoice("1")))
            .await
            .unwrap();
        service.commit(&deadline, &author, doc.clone()).await.unwrap();

        let found = service
            .get_version(&deadline, &doc.id(), &doc.current_version())
            .await
            .unwrap();
        assert_eq!(found.status(), DocumentStatus::Anchored);

        let other_root = DocumentIdentifier([3; 32]);
        assert!(service
            .get_version(&deadline, &other_root, &doc.current_version())
            .await
            .is_err());

        let current = service.get_current_version(&deadline, &doc.id()).await.unwrap();
        assert_eq!(current.current_version(), doc.current_version());
    }
}
