//! # Anchoring Pipeline
//!
//! Each step gates the next; a failure before the anchored write returns
//! the originating error and leaves no final anchor state behind.
//!
//! One version is committed by at most one caller at a time. A commit first
//! looks at what earlier attempts left behind: an anchored version is
//! refused with `StoreError::AlreadyAnchored` before anything is signed or
//! submitted, and a committing version the ledger already anchored is
//! finished from the ledger's record instead of being anchored again.

use crate::domain::errors::{AnchorError, AnchorResult, StoreError, SubmitError};
use crate::domain::ledger::{AnchorCommit, TxHandle};
use crate::domain::roots::{document_root, signing_root};
use crate::ports::outbound::{CommittedDocumentStore, Envelope, Transport};
use crate::service::connection::LedgerConnection;
use crate::service::submitter::TransactionSubmitter;
use da_01_document_model::{DocumentIdentifier, DocumentModel, DocumentStatus};
use da_02_signatures::{
    sign, validate_entity_binding, validate_signature, IdentityConfig, IdentityResolver, SignatureError,
};
use parking_lot::Mutex;
use shared_types::{Deadline, Hash, Identity};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, instrument, warn};

type VersionLocks = Mutex<HashMap<DocumentIdentifier, Arc<tokio::sync::Mutex<()>>>>;

/// Exclusive right to commit one version. The lock entry is dropped with
/// the last holder.
struct CommitGuard<'a> {
    locks: &'a VersionLocks,
    version: DocumentIdentifier,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock();
        if locks
            .get(&self.version)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.version);
        }
    }
}

/// Pipeline switches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Request and validate collaborator signatures before anchoring
    pub collect_signatures: bool,
    /// Send the anchored document to collaborators
    pub propagate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            collect_signatures: true,
            propagate: true,
        }
    }
}

/// Result of a successful anchoring.
#[derive(Clone, Debug)]
pub struct AnchorReceipt {
    pub document: Box<dyn DocumentModel>,
    pub tx: TxHandle,
    /// Collaborators the anchored document could not be delivered to
    pub undelivered: Vec<Identity>,
}

pub struct AnchoringPipeline {
    config: PipelineConfig,
    resolver: Arc<dyn IdentityResolver>,
    store: Arc<dyn CommittedDocumentStore>,
    transport: Arc<dyn Transport>,
    connection: Arc<LedgerConnection>,
    submitter: Arc<TransactionSubmitter>,
    in_flight: VersionLocks,
}

impl AnchoringPipeline {
    pub fn new(
        config: PipelineConfig,
        resolver: Arc<dyn IdentityResolver>,
        store: Arc<dyn CommittedDocumentStore>,
        transport: Arc<dyn Transport>,
        connection: Arc<LedgerConnection>,
        submitter: Arc<TransactionSubmitter>,
    ) -> Self {
        Self {
            config,
            resolver,
            store,
            transport,
            connection,
            submitter,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Sign, persist and anchor `document` on behalf of `signer`.
    #[instrument(skip_all, fields(document = %document.id(), version = %document.current_version()))]
    pub async fn anchor(
        &self,
        deadline: &Deadline,
        signer: &IdentityConfig,
        mut document: Box<dyn DocumentModel>,
    ) -> AnchorResult<AnchorReceipt> {
        // 1. Shape, then exclusive access to the version
        validate_shape(&*document)?;
        let version = document.current_version();
        let _commit = self.begin_commit(deadline, version).await?;
        if let Some(receipt) = self.resume(deadline, signer, &version).await? {
            return Ok(receipt);
        }

        // 2. Signing root
        let root = signing_root(&document.signing_fields());
        document.core_mut().set_signing_root(root);

        // 3. Own signature
        document.core_mut().append_signature(sign(signer, &root))?;

        // 4. Collaborator signatures
        if self.config.collect_signatures {
            self.collect_signatures(deadline, signer, &mut document, &root).await?;
        }

        // 5. Durability first
        document.core_mut().mark_committing()?;
        deadline.run(self.store.put(document.clone())).await??;
        debug!("persisted committing version");

        // 6. Document root and ledger anchor
        for signature in document.core().signatures() {
            deadline
                .run(validate_signature(&*self.resolver, signature, &root))
                .await??;
        }
        let doc_root = document_root(&root, document.core().signatures());
        document.core_mut().set_document_root(doc_root)?;

        let commit = AnchorCommit {
            anchor_id: document.current_version(),
            document_root: doc_root,
            signer: signer.identity,
        };
        let tx = self.submit(deadline, commit).await?;

        // 7. Final write, then propagate
        self.finish(deadline, signer, document, tx).await
    }

    async fn begin_commit(
        &self,
        deadline: &Deadline,
        version: DocumentIdentifier,
    ) -> AnchorResult<CommitGuard<'_>> {
        let lock = self.in_flight.lock().entry(version).or_default().clone();
        let guard = deadline.run(lock.lock_owned()).await?;
        Ok(CommitGuard {
            locks: &self.in_flight,
            version,
            guard: Some(guard),
        })
    }

    /// Settle what an earlier commit of `version` left in the store.
    ///
    /// Returns a receipt when the earlier commit reached the ledger but not
    /// the anchored write, and `None` when the version must be anchored
    /// from scratch.
    async fn resume(
        &self,
        deadline: &Deadline,
        signer: &IdentityConfig,
        version: &DocumentIdentifier,
    ) -> AnchorResult<Option<AnchorReceipt>> {
        let mut stored = match deadline.run(self.store.get(version)).await? {
            Ok(stored) => stored,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match stored.status() {
            DocumentStatus::Anchored => return Err(StoreError::AlreadyAnchored(*version).into()),
            DocumentStatus::Committing => {}
            _ => return Ok(None),
        }

        let Some(anchor) = deadline
            .run(self.connection.client().find_anchor(version))
            .await?
            .map_err(SubmitError::Ledger)?
        else {
            return Ok(None);
        };

        let root = stored
            .core()
            .signing_root()
            .ok_or_else(|| AnchorError::InvalidDocument("committing version has no signing root".into()))?;
        let doc_root = document_root(&root, stored.core().signatures());
        if doc_root != anchor.commit.document_root {
            return Err(AnchorError::AnchorMismatch(*version));
        }

        warn!(%version, "version already anchored on the ledger, completing the earlier commit");
        stored.core_mut().set_document_root(doc_root)?;
        self.finish(deadline, signer, stored, anchor.tx).await.map(Some)
    }

    /// Store the anchored version and hand it to the collaborators.
    async fn finish(
        &self,
        deadline: &Deadline,
        signer: &IdentityConfig,
        mut document: Box<dyn DocumentModel>,
        tx: TxHandle,
    ) -> AnchorResult<AnchorReceipt> {
        document.core_mut().mark_anchored()?;
        deadline.run(self.store.put(document.clone())).await??;
        info!(tx = %hex::encode(tx.tx_hash), "document anchored");

        let undelivered = if self.config.propagate {
            self.propagate(deadline, signer, &*document).await
        } else {
            Vec::new()
        };

        Ok(AnchorReceipt {
            document,
            tx,
            undelivered,
        })
    }

    async fn submit(&self, deadline: &Deadline, commit: AnchorCommit) -> AnchorResult<TxHandle> {
        let client = self.connection.client().clone();
        let account = self.connection.account().to_string();
        let tx = self
            .submitter
            .submit(deadline, &account, || {
                let client = client.clone();
                let account = account.clone();
                let commit = commit.clone();
                async move { client.commit_anchor(&account, &commit).await }
            })
            .await?;
        Ok(tx)
    }

    /// Peers that must sign besides `signer`.
    fn co_signers(document: &dyn DocumentModel, signer: &IdentityConfig) -> Vec<Identity> {
        document
            .core()
            .default_members()
            .into_iter()
            .filter(|id| *id != signer.identity)
            .collect()
    }

    async fn collect_signatures(
        &self,
        deadline: &Deadline,
        signer: &IdentityConfig,
        document: &mut Box<dyn DocumentModel>,
        root: &Hash,
    ) -> AnchorResult<()> {
        for peer in Self::co_signers(&**document, signer) {
            let record = deadline
                .run(self.resolver.lookup(&peer))
                .await?
                .map_err(SignatureError::from)?;
            let signature = deadline
                .run(self.transport.request_signature(&record.transport_address, &**document))
                .await??;

            validate_entity_binding(&signature, &peer)?;
            deadline
                .run(validate_signature(&*self.resolver, &signature, root))
                .await??;
            debug!(%peer, "collected signature");
            document.core_mut().append_signature(signature)?;
        }
        Ok(())
    }

    async fn propagate(
        &self,
        deadline: &Deadline,
        signer: &IdentityConfig,
        document: &dyn DocumentModel,
    ) -> Vec<Identity> {
        let mut undelivered = Vec::new();
        for peer in Self::co_signers(document, signer) {
            let envelope = Envelope {
                sender: signer.identity,
                document: document.clone_model(),
            };
            let delivered = async {
                let record = self.resolver.lookup(&peer).await.map_err(|e| e.to_string())?;
                self.transport
                    .send(&record.transport_address, envelope)
                    .await
                    .map_err(|e| e.to_string())
            };
            match deadline.run(delivered).await {
                Ok(Ok(())) => debug!(%peer, "document delivered"),
                Ok(Err(reason)) => {
                    warn!(%peer, %reason, "failed to deliver anchored document");
                    undelivered.push(peer);
                }
                Err(_) => {
                    warn!(%peer, "deadline passed while delivering anchored document");
                    undelivered.push(peer);
                }
            }
        }
        undelivered
    }
}

fn validate_shape(document: &dyn DocumentModel) -> AnchorResult<()> {
    if document.current_version() == document.next_version() {
        return Err(AnchorError::InvalidDocument("version chain does not advance".into()));
    }
    if document.status() == DocumentStatus::Anchored {
        return Err(AnchorError::InvalidDocument(format!(
            "version {} already anchored",
            document.current_version()
        )));
    }
    Ok(())
}
