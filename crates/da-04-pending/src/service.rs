//! # Pending Lifecycle Service
//!
//! Implements `PendingDocumentApi` over a pending repository and the
//! committed document service.
//!
//! Mutations load the caller's pending record, apply the change through the
//! document's policy and write the record back. A failed mutation writes
//! nothing. Policy changes are themselves gated by the policy on the
//! `roles`, `transition_rules` and `collaborators` fields.

use crate::domain::context::RequestContext;
use crate::domain::errors::{PendingError, PendingResult, RepositoryError};
use crate::ports::inbound::{PendingDocumentApi, RuleRequest};
use crate::ports::outbound::PendingRepository;
use async_trait::async_trait;
use da_01_document_model::{
    DocumentIdentifier, DocumentModel, DocumentStatus, FieldKey, Role, RoleKey, RuleKey, TransitionAction,
    TransitionRule, UpdatePayload,
};
use da_02_signatures::{new_signed_attribute, IdentityConfig};
use da_03_anchoring::{AnchorError, AnchorReceipt, DocumentServiceApi, StoreError};
use shared_types::{Classify, ErrorClass, Identity};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const ROLES_FIELD: &str = "roles";
const RULES_FIELD: &str = "transition_rules";
const COLLABORATORS_FIELD: &str = "collaborators";

pub struct PendingService {
    repository: Arc<dyn PendingRepository>,
    documents: Arc<dyn DocumentServiceApi>,
}

/// Committed-store miss for `id`, keeping every other error as is.
fn committed_miss(id: &DocumentIdentifier) -> impl FnOnce(AnchorError) -> PendingError + '_ {
    move |err| {
        if err.class() == ErrorClass::NotFound {
            PendingError::DocumentNotFound(*id)
        } else {
            PendingError::Anchor(err)
        }
    }
}

fn require(
    document: &dyn DocumentModel,
    actor: &Identity,
    field: &str,
    action: TransitionAction,
) -> PendingResult<()> {
    Ok(document.core().require(actor, &FieldKey::named(field), action)?)
}

impl PendingService {
    pub fn new(repository: Arc<dyn PendingRepository>, documents: Arc<dyn DocumentServiceApi>) -> Self {
        Self {
            repository,
            documents,
        }
    }

    /// Drop the pending record of a committed document. A record already
    /// gone counts as dropped.
    async fn discard(&self, account: &Identity, id: &DocumentIdentifier) -> PendingResult<()> {
        match self.repository.delete(account, id).await {
            Ok(()) | Err(RepositoryError::NotFound { .. }) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn load_pending(
        &self,
        ctx: &RequestContext,
        account: &Identity,
        id: &DocumentIdentifier,
    ) -> PendingResult<Box<dyn DocumentModel>> {
        Ok(ctx.deadline().run(self.repository.get(account, id)).await??)
    }

    async fn load_committed(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
    ) -> PendingResult<Box<dyn DocumentModel>> {
        self.documents
            .get_current_version(ctx.deadline(), id)
            .await
            .map_err(committed_miss(id))
    }

    /// Pending record first, then the latest committed version.
    async fn load(&self, ctx: &RequestContext, id: &DocumentIdentifier) -> PendingResult<Box<dyn DocumentModel>> {
        let account = ctx.account()?;
        match self.load_pending(ctx, &account.identity, id).await {
            Ok(document) => Ok(document),
            Err(err) => {
                debug!(document = %id, %err, "pending lookup missed, trying committed store");
                self.load_committed(ctx, id).await
            }
        }
    }

    /// Load the caller's pending record, apply `change` and write it back.
    async fn mutate<T, F>(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        change: F,
    ) -> PendingResult<(Box<dyn DocumentModel>, T)>
    where
        F: FnOnce(&IdentityConfig, &mut Box<dyn DocumentModel>) -> PendingResult<T> + Send,
        T: Send,
    {
        let account = ctx.account()?;
        let mut document = self.load_pending(ctx, &account.identity, id).await?;
        let out = change(account, &mut document)?;
        ctx.deadline()
            .run(self.repository.update(&account.identity, id, document.clone()))
            .await??;
        Ok((document, out))
    }
}

#[async_trait]
impl PendingDocumentApi for PendingService {
    #[instrument(skip_all, fields(request = %ctx.request_id()))]
    async fn create(&self, ctx: &RequestContext, payload: &UpdatePayload) -> PendingResult<Box<dyn DocumentModel>> {
        let account = ctx.account()?;
        if let Some(existing) = payload.document_id {
            if self.load_pending(ctx, &account.identity, &existing).await.is_ok() {
                return Err(PendingError::PendingDocumentExists(existing));
            }
        }

        let mut document = self
            .documents
            .derive(ctx.deadline(), &account.identity, payload)
            .await?;
        document.core_mut().mark_pending()?;

        let id = document.id();
        ctx.deadline()
            .run(self.repository.create(&account.identity, &id, document.clone()))
            .await??;
        info!(document = %id, version = %document.current_version(), "pending document created");
        Ok(document)
    }

    #[instrument(skip_all, fields(request = %ctx.request_id()))]
    async fn update(&self, ctx: &RequestContext, payload: &UpdatePayload) -> PendingResult<Box<dyn DocumentModel>> {
        let id = payload.document_id.ok_or(PendingError::MissingDocumentId)?;
        let (document, ()) = self
            .mutate(ctx, &id, |account, document| {
                document.patch(&account.identity, payload)?;
                Ok(())
            })
            .await?;
        debug!(document = %id, "pending document updated");
        Ok(document)
    }

    #[instrument(skip(self, ctx), fields(request = %ctx.request_id(), document = %id))]
    async fn get(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        status: DocumentStatus,
    ) -> PendingResult<Box<dyn DocumentModel>> {
        match status {
            DocumentStatus::Draft | DocumentStatus::Pending => self.load(ctx, id).await,
            DocumentStatus::Committing | DocumentStatus::Anchored => self.load_committed(ctx, id).await,
        }
    }

    #[instrument(skip(self, ctx), fields(request = %ctx.request_id(), document = %id, version = %version))]
    async fn get_version(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        version: &DocumentIdentifier,
    ) -> PendingResult<Box<dyn DocumentModel>> {
        let account = ctx.account()?;
        match self.documents.get_version(ctx.deadline(), id, version).await {
            Ok(document) => return Ok(document),
            Err(err) if err.class() == ErrorClass::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let document = self.load_pending(ctx, &account.identity, id).await?;
        if document.current_version() != *version {
            return Err(PendingError::DocumentNotFound(*id));
        }
        Ok(document)
    }

    #[instrument(skip(self, ctx), fields(request = %ctx.request_id(), document = %id))]
    async fn commit(&self, ctx: &RequestContext, id: &DocumentIdentifier) -> PendingResult<AnchorReceipt> {
        let account = ctx.account()?;
        let document = self.load_pending(ctx, &account.identity, id).await?;
        let receipt = match self.documents.commit(ctx.deadline(), account, document).await {
            Ok(receipt) => receipt,
            Err(AnchorError::Store(StoreError::AlreadyAnchored(version))) => {
                // An earlier commit anchored this version but kept the record.
                warn!(%version, "pending record outlived its anchor, discarding");
                self.discard(&account.identity, id).await?;
                return Err(PendingError::DocumentNotFound(*id));
            }
            Err(err) => return Err(err.into()),
        };

        // The anchor is final; cleanup is not bound by the deadline.
        self.discard(&account.identity, id).await?;
        info!(
            version = %receipt.document.current_version(),
            undelivered = receipt.undelivered.len(),
            "pending document committed"
        );
        Ok(receipt)
    }

    #[instrument(skip(self, ctx), fields(request = %ctx.request_id(), document = %id))]
    async fn delete(&self, ctx: &RequestContext, id: &DocumentIdentifier) -> PendingResult<()> {
        let account = ctx.account()?;
        ctx.deadline()
            .run(self.repository.delete(&account.identity, id))
            .await??;
        info!("pending document discarded");
        Ok(())
    }

    #[instrument(skip(self, ctx, value), fields(request = %ctx.request_id(), document = %id))]
    async fn add_signed_attribute(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        label: &str,
        value: &[u8],
    ) -> PendingResult<Box<dyn DocumentModel>> {
        let (document, ()) = self
            .mutate(ctx, id, |account, document| {
                let attribute =
                    new_signed_attribute(label, account, document.id(), document.current_version(), value)?;
                document.add_attributes(&account.identity, vec![attribute])?;
                Ok(())
            })
            .await?;
        Ok(document)
    }

    #[instrument(skip(self, ctx, identities), fields(request = %ctx.request_id(), document = %id, count = identities.len()))]
    async fn remove_collaborators(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        identities: &[Identity],
    ) -> PendingResult<Box<dyn DocumentModel>> {
        let (document, ()) = self
            .mutate(ctx, id, |account, document| {
                require(&**document, &account.identity, COLLABORATORS_FIELD, TransitionAction::Delete)?;
                Ok(document.remove_collaborators(identities)?)
            })
            .await?;
        Ok(document)
    }

    #[instrument(skip(self, ctx), fields(request = %ctx.request_id(), document = %id))]
    async fn get_role(&self, ctx: &RequestContext, id: &DocumentIdentifier, key: &RoleKey) -> PendingResult<Role> {
        Ok(self.load(ctx, id).await?.get_role(key)?)
    }

    #[instrument(skip(self, ctx, collaborators), fields(request = %ctx.request_id(), document = %id))]
    async fn add_role(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        label: &str,
        collaborators: &[Identity],
    ) -> PendingResult<Role> {
        let (_, role) = self
            .mutate(ctx, id, |account, document| {
                require(&**document, &account.identity, ROLES_FIELD, TransitionAction::Edit)?;
                Ok(document.add_role(label, collaborators)?)
            })
            .await?;
        Ok(role)
    }

    #[instrument(skip(self, ctx, collaborators), fields(request = %ctx.request_id(), document = %id))]
    async fn update_role(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        key: &RoleKey,
        collaborators: &[Identity],
    ) -> PendingResult<Role> {
        let (_, role) = self
            .mutate(ctx, id, |account, document| {
                require(&**document, &account.identity, ROLES_FIELD, TransitionAction::Edit)?;
                Ok(document.update_role(key, collaborators)?)
            })
            .await?;
        Ok(role)
    }

    #[instrument(skip(self, ctx, rules), fields(request = %ctx.request_id(), document = %id, count = rules.len()))]
    async fn add_transition_rules(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        rules: &[RuleRequest],
    ) -> PendingResult<Vec<TransitionRule>> {
        let (_, added) = self
            .mutate(ctx, id, |account, document| {
                require(&**document, &account.identity, RULES_FIELD, TransitionAction::Edit)?;
                rules
                    .iter()
                    .map(|r| {
                        document
                            .add_transition_rule(&r.role, r.field.clone(), r.action)
                            .map_err(PendingError::from)
                    })
                    .collect()
            })
            .await?;
        Ok(added)
    }

    #[instrument(skip(self, ctx), fields(request = %ctx.request_id(), document = %id))]
    async fn get_transition_rule(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        key: &RuleKey,
    ) -> PendingResult<TransitionRule> {
        Ok(self.load(ctx, id).await?.get_transition_rule(key)?)
    }

    #[instrument(skip(self, ctx), fields(request = %ctx.request_id(), document = %id))]
    async fn delete_transition_rule(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        key: &RuleKey,
    ) -> PendingResult<()> {
        self.mutate(ctx, id, |account, document| {
            require(&**document, &account.identity, RULES_FIELD, TransitionAction::Delete)?;
            Ok(document.delete_transition_rule(key)?)
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPendingRepository;
    use da_01_document_model::{AttrValue, CreatePayload, DocumentError, DocumentKind};
    use da_02_signatures::{verify_signed_attribute, InMemoryIdentityResolver};
    use da_03_anchoring::{
        AnchoringPipeline, DocumentService, InMemoryDocumentStore, InMemoryTransport, LedgerConfig,
        LedgerConnection, LedgerError, MockLedgerClient, PipelineConfig, SubmitError, SubmitterConfig,
        TransactionSubmitter,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// Repository whose first delete fails.
    struct StickyRepository {
        inner: Arc<InMemoryPendingRepository>,
        failed: AtomicBool,
    }

    #[async_trait]
    impl PendingRepository for StickyRepository {
        async fn get(
            &self,
            account: &Identity,
            id: &DocumentIdentifier,
        ) -> Result<Box<dyn DocumentModel>, RepositoryError> {
            self.inner.get(account, id).await
        }

        async fn create(
            &self,
            account: &Identity,
            id: &DocumentIdentifier,
            document: Box<dyn DocumentModel>,
        ) -> Result<(), RepositoryError> {
            self.inner.create(account, id, document).await
        }

        async fn update(
            &self,
            account: &Identity,
            id: &DocumentIdentifier,
            document: Box<dyn DocumentModel>,
        ) -> Result<(), RepositoryError> {
            self.inner.update(account, id, document).await
        }

        async fn delete(&self, account: &Identity, id: &DocumentIdentifier) -> Result<(), RepositoryError> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(RepositoryError::Backend("connection reset".into()));
            }
            self.inner.delete(account, id).await
        }
    }

    struct Fixture {
        service: PendingService,
        repository: Arc<InMemoryPendingRepository>,
        resolver: Arc<InMemoryIdentityResolver>,
        ledger: Arc<MockLedgerClient>,
        alice: Arc<IdentityConfig>,
        bob: Arc<IdentityConfig>,
    }

    impl Fixture {
        fn alice(&self) -> RequestContext {
            RequestContext::new(self.alice.clone())
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(|repository| repository).await
    }

    async fn fixture_with(
        wrap: impl FnOnce(Arc<InMemoryPendingRepository>) -> Arc<dyn PendingRepository>,
    ) -> Fixture {
        let alice = Arc::new(IdentityConfig::generate(Identity([1; 20])));
        let bob = Arc::new(IdentityConfig::generate(Identity([2; 20])));

        let resolver = Arc::new(InMemoryIdentityResolver::new());
        let transport = Arc::new(InMemoryTransport::new());
        for (address, config) in [("alice", &alice), ("bob", &bob)] {
            resolver.register(config.identity, address, config.public_key());
            transport.register_peer(address, (*config).clone());
        }

        let ledger = Arc::new(MockLedgerClient::new(1));
        let connection = LedgerConnection::connect(&LedgerConfig::default(), ledger.clone())
            .await
            .unwrap();
        let store = Arc::new(InMemoryDocumentStore::new());
        let pipeline = AnchoringPipeline::new(
            PipelineConfig::default(),
            resolver.clone(),
            store.clone(),
            transport,
            Arc::new(connection),
            Arc::new(TransactionSubmitter::new(SubmitterConfig {
                max_retries: 3,
                retry_interval: Duration::from_millis(1),
            })),
        );
        let documents = Arc::new(DocumentService::new(store, pipeline));
        let repository = Arc::new(InMemoryPendingRepository::new());

        Fixture {
            service: PendingService::new(wrap(repository.clone()), documents),
            repository,
            resolver,
            ledger,
            alice,
            bob,
        }
    }

    fn invoice(amount: &str) -> CreatePayload {
        CreatePayload::new(DocumentKind::Invoice).with_field("amount", amount)
    }

    #[tokio::test]
    async fn test_create_requires_account() {
        let fx = fixture().await;
        let err = fx
            .service
            .create(&RequestContext::anonymous(), &UpdatePayload::new_document(invoice("1")))
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::ContextMissing);
        assert!(fx.repository.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_get_pending() {
        let fx = fixture().await;
        let created = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        assert_eq!(created.status(), DocumentStatus::Pending);

        let loaded = fx
            .service
            .get(&fx.alice(), &created.id(), DocumentStatus::Pending)
            .await
            .unwrap();
        assert_eq!(loaded.current_version(), created.current_version());
        assert_eq!(loaded.field("amount"), Some("100"));

        let err = fx
            .service
            .get(&fx.alice(), &created.id(), DocumentStatus::Anchored)
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::DocumentNotFound(created.id()));
    }

    #[tokio::test]
    async fn test_update_keeps_version() {
        let fx = fixture().await;
        let created = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();

        let updated = fx
            .service
            .update(&fx.alice(), &UpdatePayload::for_document(created.id(), invoice("250")))
            .await
            .unwrap();
        assert_eq!(updated.current_version(), created.current_version());
        assert_eq!(updated.next_version(), created.next_version());
        assert_eq!(updated.field("amount"), Some("250"));
    }

    #[tokio::test]
    async fn test_update_generic_not_patchable() {
        let fx = fixture().await;
        let created = fx
            .service
            .create(
                &fx.alice(),
                &UpdatePayload::new_document(CreatePayload::new(DocumentKind::Generic)),
            )
            .await
            .unwrap();

        let err = fx
            .service
            .update(
                &fx.alice(),
                &UpdatePayload::for_document(created.id(), CreatePayload::new(DocumentKind::Generic)),
            )
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::Document(DocumentError::NotPatchable));
    }

    #[tokio::test]
    async fn test_update_without_document_id() {
        let fx = fixture().await;
        let err = fx
            .service
            .update(&fx.alice(), &UpdatePayload::new_document(invoice("1")))
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::MissingDocumentId);
    }

    #[tokio::test]
    async fn test_commit_twice_second_not_found() {
        let fx = fixture().await;
        let created = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();

        let receipt = fx.service.commit(&fx.alice(), &created.id()).await.unwrap();
        assert_eq!(receipt.document.status(), DocumentStatus::Anchored);
        assert!(fx.repository.is_empty());

        let err = fx.service.commit(&fx.alice(), &created.id()).await.unwrap_err();
        assert_eq!(err, PendingError::DocumentNotFound(created.id()));
        assert_eq!(fx.ledger.anchors().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_pending_record() {
        let fx = fixture().await;
        let created = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        fx.ledger.fail_next([LedgerError::Reverted("paused".into())]);

        let err = fx.service.commit(&fx.alice(), &created.id()).await.unwrap_err();
        assert_eq!(
            err,
            PendingError::Anchor(AnchorError::Submit(SubmitError::Ledger(LedgerError::Reverted(
                "paused".into()
            ))))
        );
        assert_eq!(fx.repository.len(), 1);

        fx.service.commit(&fx.alice(), &created.id()).await.unwrap();
        assert!(fx.repository.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_commit_anchors_once() {
        let fx = fixture().await;
        fx.ledger.set_latency(Duration::from_millis(50));
        let created = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();

        let ctx = fx.alice();
        let created_id = created.id();
        let (a, b) = tokio::join!(
            fx.service.commit(&ctx, &created_id),
            fx.service.commit(&ctx, &created_id)
        );

        let (receipt, err) = match (a, b) {
            (Ok(receipt), Err(err)) | (Err(err), Ok(receipt)) => (receipt, err),
            other => panic!("expected exactly one commit to succeed: {other:?}"),
        };
        assert_eq!(receipt.document.status(), DocumentStatus::Anchored);
        assert_eq!(err, PendingError::DocumentNotFound(created.id()));
        assert_eq!(fx.ledger.anchors().len(), 1);
        assert!(fx.repository.is_empty());
    }

    #[tokio::test]
    async fn test_commit_after_failed_cleanup_discards_record() {
        let fx = fixture_with(|repository| {
            Arc::new(StickyRepository {
                inner: repository,
                failed: AtomicBool::new(false),
            })
        })
        .await;
        let created = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();

        let err = fx.service.commit(&fx.alice(), &created.id()).await.unwrap_err();
        assert_eq!(
            err,
            PendingError::from(RepositoryError::Backend("connection reset".into()))
        );
        assert_eq!(fx.ledger.anchors().len(), 1);
        assert_eq!(fx.repository.len(), 1);

        let err = fx.service.commit(&fx.alice(), &created.id()).await.unwrap_err();
        assert_eq!(err, PendingError::DocumentNotFound(created.id()));
        assert_eq!(fx.ledger.anchors().len(), 1);
        assert_eq!(fx.ledger.attempts(), 1);
        assert!(fx.repository.is_empty());

        let anchored = fx
            .service
            .get(&fx.alice(), &created.id(), DocumentStatus::Anchored)
            .await
            .unwrap();
        assert_eq!(anchored.current_version(), created.current_version());
    }

    #[tokio::test]
    async fn test_concurrent_create_same_key() {
        let fx = fixture().await;
        let v1 = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        fx.service.commit(&fx.alice(), &v1.id()).await.unwrap();

        let ctx = fx.alice();
        let payload = UpdatePayload::for_document(v1.id(), invoice("200"));
        let (a, b) = tokio::join!(
            fx.service.create(&ctx, &payload),
            fx.service.create(&ctx, &payload)
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(PendingError::PendingDocumentExists(id)) if *id == v1.id())));
    }

    #[tokio::test]
    async fn test_role_lookup_falls_back_to_committed() {
        let fx = fixture().await;
        let created = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        let role = fx
            .service
            .add_role(&fx.alice(), &created.id(), "payers", &[fx.alice.identity])
            .await
            .unwrap();
        fx.service.commit(&fx.alice(), &created.id()).await.unwrap();

        let found = fx
            .service
            .get_role(&fx.alice(), &created.id(), &role.key)
            .await
            .unwrap();
        assert_eq!(found, role);

        let err = fx
            .service
            .get_role(&RequestContext::anonymous(), &created.id(), &role.key)
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::ContextMissing);
    }

    #[tokio::test]
    async fn test_get_version_committed_then_pending() {
        let fx = fixture().await;
        let v1 = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        fx.service.commit(&fx.alice(), &v1.id()).await.unwrap();
        let v2 = fx
            .service
            .create(&fx.alice(), &UpdatePayload::for_document(v1.id(), invoice("110")))
            .await
            .unwrap();

        let committed = fx
            .service
            .get_version(&fx.alice(), &v1.id(), &v1.current_version())
            .await
            .unwrap();
        assert_eq!(committed.status(), DocumentStatus::Anchored);

        let pending = fx
            .service
            .get_version(&fx.alice(), &v1.id(), &v2.current_version())
            .await
            .unwrap();
        assert_eq!(pending.status(), DocumentStatus::Pending);

        let err = fx
            .service
            .get_version(&fx.alice(), &v1.id(), &DocumentIdentifier([4; 32]))
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::DocumentNotFound(v1.id()));
    }

    #[tokio::test]
    async fn test_add_transition_rules_all_or_nothing() {
        let fx = fixture().await;
        let doc = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        let payers = fx
            .service
            .add_role(&fx.alice(), &doc.id(), "payers", &[fx.alice.identity])
            .await
            .unwrap();

        let ghost = RoleKey::from_label("ghost");
        let rules = [
            RuleRequest {
                role: payers.key,
                field: FieldKey::named("amount"),
                action: TransitionAction::Edit,
            },
            RuleRequest {
                role: ghost,
                field: FieldKey::named("currency"),
                action: TransitionAction::Edit,
            },
        ];
        let err = fx
            .service
            .add_transition_rules(&fx.alice(), &doc.id(), &rules)
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::Document(DocumentError::RoleNotFound(ghost)));

        let stored = fx
            .service
            .get(&fx.alice(), &doc.id(), DocumentStatus::Pending)
            .await
            .unwrap();
        assert!(stored.core().policy().rules().is_empty());

        let added = fx
            .service
            .add_transition_rules(&fx.alice(), &doc.id(), &rules[..1])
            .await
            .unwrap();
        let fetched = fx
            .service
            .get_transition_rule(&fx.alice(), &doc.id(), &added[0].key)
            .await
            .unwrap();
        assert_eq!(fetched, added[0]);

        fx.service
            .delete_transition_rule(&fx.alice(), &doc.id(), &added[0].key)
            .await
            .unwrap();
        let err = fx
            .service
            .get_transition_rule(&fx.alice(), &doc.id(), &added[0].key)
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::Document(DocumentError::RuleNotFound(added[0].key)));
    }

    #[tokio::test]
    async fn test_add_signed_attribute_binds_current_version() {
        let fx = fixture().await;
        let doc = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();

        let updated = fx
            .service
            .add_signed_attribute(&fx.alice(), &doc.id(), "approval", b"approved")
            .await
            .unwrap();
        let attribute = updated.core().attribute("approval").unwrap();
        let AttrValue::Signed(signed) = &attribute.value else {
            panic!("expected signed attribute");
        };
        assert_eq!(signed.signer, fx.alice.identity);
        assert_eq!(signed.version, doc.current_version());
        assert!(verify_signed_attribute(&*fx.resolver, attribute).await.is_ok());
    }

    #[tokio::test]
    async fn test_remove_collaborators_keeps_rules_satisfiable() {
        let fx = fixture().await;
        let payload = invoice("100").with_collaborators([fx.bob.identity]);
        let doc = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(payload))
            .await
            .unwrap();
        let payers = fx
            .service
            .add_role(&fx.alice(), &doc.id(), "payers", &[fx.bob.identity])
            .await
            .unwrap();
        fx.service
            .add_transition_rules(
                &fx.alice(),
                &doc.id(),
                &[RuleRequest {
                    role: payers.key,
                    field: FieldKey::named("amount"),
                    action: TransitionAction::Edit,
                }],
            )
            .await
            .unwrap();

        let err = fx
            .service
            .remove_collaborators(&fx.alice(), &doc.id(), &[fx.bob.identity])
            .await
            .unwrap_err();
        assert_eq!(err, PendingError::Document(DocumentError::RoleWouldBeEmpty(payers.key)));

        fx.service
            .update_role(&fx.alice(), &doc.id(), &payers.key, &[fx.alice.identity, fx.bob.identity])
            .await
            .unwrap();
        let updated = fx
            .service
            .remove_collaborators(&fx.alice(), &doc.id(), &[fx.bob.identity])
            .await
            .unwrap();
        assert!(!updated.core().collaborators().contains(&fx.bob.identity));
        assert!(!updated
            .get_role(&payers.key)
            .unwrap()
            .contains(&fx.bob.identity));
    }

    #[tokio::test]
    async fn test_delete_discards_pending() {
        let fx = fixture().await;
        let doc = fx
            .service
            .create(&fx.alice(), &UpdatePayload::new_document(invoice("100")))
            .await
            .unwrap();
        fx.service.delete(&fx.alice(), &doc.id()).await.unwrap();
        assert!(fx.repository.is_empty());
        assert_eq!(
            fx.service.commit(&fx.alice(), &doc.id()).await.unwrap_err(),
            PendingError::DocumentNotFound(doc.id())
        );
    }
}
