//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::AnchorResult;
use crate::service::pipeline::AnchorReceipt;
use async_trait::async_trait;
use da_01_document_model::{DocumentIdentifier, DocumentModel, UpdatePayload};
use da_02_signatures::IdentityConfig;
use shared_types::{Deadline, Identity};

/// Committed document operations used by the pending lifecycle.
#[async_trait]
pub trait DocumentServiceApi: Send + Sync {
    /// Derive a document from a payload.
    ///
    /// Without a document id this creates a brand-new document. With one it
    /// derives the next version of the latest anchored version and applies
    /// the payload as a patch by `actor`.
    async fn derive(
        &self,
        deadline: &Deadline,
        actor: &Identity,
        payload: &UpdatePayload,
    ) -> AnchorResult<Box<dyn DocumentModel>>;

    /// Sign and anchor a document through the anchoring pipeline.
    async fn commit(
        &self,
        deadline: &Deadline,
        signer: &IdentityConfig,
        document: Box<dyn DocumentModel>,
    ) -> AnchorResult<AnchorReceipt>;

    /// Latest anchored version of `root`.
    async fn get_current_version(
        &self,
        deadline: &Deadline,
        root: &DocumentIdentifier,
    ) -> AnchorResult<Box<dyn DocumentModel>>;

    /// A specific committed version of `root`.
    async fn get_version(
        &self,
        deadline: &Deadline,
        root: &DocumentIdentifier,
        version: &DocumentIdentifier,
    ) -> AnchorResult<Box<dyn DocumentModel>>;
}
