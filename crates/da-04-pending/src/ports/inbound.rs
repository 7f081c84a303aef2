//! # Inbound Ports (Driving Ports / API)

use crate::domain::context::RequestContext;
use crate::domain::errors::PendingResult;
use async_trait::async_trait;
use da_01_document_model::{
    DocumentIdentifier, DocumentModel, DocumentStatus, FieldKey, Role, RoleKey, RuleKey, TransitionAction,
    TransitionRule, UpdatePayload,
};
use da_03_anchoring::AnchorReceipt;
use shared_types::Identity;

/// One transition rule to add.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleRequest {
    pub role: RoleKey,
    pub field: FieldKey,
    pub action: TransitionAction,
}

/// Pending document lifecycle.
///
/// Every operation takes the request context; operations that need the
/// caller's account fail with `ContextMissing` without one.
#[async_trait]
pub trait PendingDocumentApi: Send + Sync {
    /// Create a pending document, new or as the next version of an anchored one.
    ///
    /// # Errors
    /// * `PendingDocumentExists` - a pending record exists for the document
    async fn create(&self, ctx: &RequestContext, payload: &UpdatePayload) -> PendingResult<Box<dyn DocumentModel>>;

    /// Patch the pending document. Version identifiers do not change.
    ///
    /// # Errors
    /// * `DocumentError::NotPatchable` - the document kind has no fields
    async fn update(&self, ctx: &RequestContext, payload: &UpdatePayload) -> PendingResult<Box<dyn DocumentModel>>;

    /// Read a document. `Draft`/`Pending` asks for the pending view (with
    /// committed fallback); `Committing`/`Anchored` reads the committed store.
    async fn get(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        status: DocumentStatus,
    ) -> PendingResult<Box<dyn DocumentModel>>;

    /// Read a version: committed store first, then the pending document if
    /// its current version is `version`.
    async fn get_version(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        version: &DocumentIdentifier,
    ) -> PendingResult<Box<dyn DocumentModel>>;

    /// Anchor the pending document and delete the pending record.
    ///
    /// A failed commit leaves the pending record in place.
    async fn commit(&self, ctx: &RequestContext, id: &DocumentIdentifier) -> PendingResult<AnchorReceipt>;

    /// Discard the pending document.
    async fn delete(&self, ctx: &RequestContext, id: &DocumentIdentifier) -> PendingResult<()>;

    /// Add an attribute signed by the caller for the current version.
    async fn add_signed_attribute(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        label: &str,
        value: &[u8],
    ) -> PendingResult<Box<dyn DocumentModel>>;

    /// Remove identities from the collaborators and every role.
    async fn remove_collaborators(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        identities: &[Identity],
    ) -> PendingResult<Box<dyn DocumentModel>>;

    async fn get_role(&self, ctx: &RequestContext, id: &DocumentIdentifier, key: &RoleKey) -> PendingResult<Role>;

    async fn add_role(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        label: &str,
        collaborators: &[Identity],
    ) -> PendingResult<Role>;

    /// Replace the role's collaborator set.
    async fn update_role(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        key: &RoleKey,
        collaborators: &[Identity],
    ) -> PendingResult<Role>;

    /// Add rules all-or-nothing.
    async fn add_transition_rules(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        rules: &[RuleRequest],
    ) -> PendingResult<Vec<TransitionRule>>;

    async fn get_transition_rule(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        key: &RuleKey,
    ) -> PendingResult<TransitionRule>;

    async fn delete_transition_rule(
        &self,
        ctx: &RequestContext,
        id: &DocumentIdentifier,
        key: &RuleKey,
    ) -> PendingResult<()>;
}
