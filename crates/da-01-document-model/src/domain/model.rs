//! # Document Capability Interface
//!
//! Every document kind implements [`DocumentModel`]. The lifecycle service
//! and the anchoring pipeline only ever see `Box<dyn DocumentModel>`.
//!
//! Kinds provide access to their embedded [`CoreDocument`] plus their own
//! fields; all policy operations are provided on top of that.

use crate::domain::attribute::{AttrKey, Attribute};
use crate::domain::document::{CoreDocument, DocumentStatus};
use crate::domain::errors::{DocumentError, DocumentResult};
use crate::domain::identifier::DocumentIdentifier;
use crate::domain::kinds::DocumentKind;
use crate::domain::payload::UpdatePayload;
use crate::domain::role::{Role, RoleKey};
use crate::domain::rule::{FieldKey, RuleKey, TransitionAction, TransitionRule};
use shared_types::Identity;
use std::fmt;

/// Kinds that support field patching.
pub trait Patchable {
    /// Apply `payload` on behalf of `actor`, authorizing every changed field.
    fn patch(&mut self, actor: &Identity, payload: &UpdatePayload) -> DocumentResult<()>;
}

/// Capability set shared by all document kinds.
pub trait DocumentModel: Send + Sync + fmt::Debug {
    fn kind(&self) -> DocumentKind;

    fn core(&self) -> &CoreDocument;

    fn core_mut(&mut self) -> &mut CoreDocument;

    fn clone_model(&self) -> Box<dyn DocumentModel>;

    /// Same kind and kind fields, different core.
    fn with_core(&self, core: CoreDocument) -> Box<dyn DocumentModel>;

    /// Patch support, if this kind has any.
    fn patcher(&mut self) -> Option<&mut dyn Patchable> {
        None
    }

    /// Kind-specific fields covered by the signing root.
    fn kind_fields(&self) -> Vec<(String, Vec<u8>)> {
        Vec::new()
    }

    /// Current value of a named kind field.
    fn field(&self, _name: &str) -> Option<&str> {
        None
    }

    fn id(&self) -> DocumentIdentifier {
        self.core().id()
    }

    fn current_version(&self) -> DocumentIdentifier {
        self.core().current_version()
    }

    fn next_version(&self) -> DocumentIdentifier {
        self.core().next_version()
    }

    fn status(&self) -> DocumentStatus {
        self.core().status()
    }

    fn patch(&mut self, actor: &Identity, payload: &UpdatePayload) -> DocumentResult<()> {
        let patcher = self.patcher().ok_or(DocumentError::NotPatchable)?;
        patcher.patch(actor, payload)
    }

    fn add_role(&mut self, label: &str, collaborators: &[Identity]) -> DocumentResult<Role> {
        self.core_mut().add_role(label, collaborators)
    }

    fn update_role(&mut self, key: &RoleKey, collaborators: &[Identity]) -> DocumentResult<Role> {
        self.core_mut().update_role(key, collaborators)
    }

    fn get_role(&self, key: &RoleKey) -> DocumentResult<Role> {
        self.core().get_role(key)
    }

    /// Grant `role` edit rights on the attribute `key`.
    fn add_transition_rule_for_attribute(
        &mut self,
        role: &RoleKey,
        key: &AttrKey,
    ) -> DocumentResult<TransitionRule> {
        self.core_mut()
            .add_transition_rule(role, FieldKey::attribute(key), TransitionAction::Edit)
    }

    fn add_transition_rule(
        &mut self,
        role: &RoleKey,
        field: FieldKey,
        action: TransitionAction,
    ) -> DocumentResult<TransitionRule> {
        self.core_mut().add_transition_rule(role, field, action)
    }

    fn get_transition_rule(&self, key: &RuleKey) -> DocumentResult<TransitionRule> {
        self.core().get_transition_rule(key)
    }

    fn delete_transition_rule(&mut self, key: &RuleKey) -> DocumentResult<()> {
        self.core_mut().delete_transition_rule(key)
    }

    fn add_attributes(&mut self, actor: &Identity, attributes: Vec<Attribute>) -> DocumentResult<()> {
        self.core_mut().add_attributes(actor, attributes)
    }

    fn remove_collaborators(&mut self, identities: &[Identity]) -> DocumentResult<()> {
        self.core_mut().remove_collaborators(identities)
    }

    fn authorize(&self, actor: &Identity, field: &FieldKey, action: TransitionAction) -> bool {
        self.core().authorize(actor, field, action)
    }

    fn derive_next_version(&self) -> Box<dyn DocumentModel> {
        self.with_core(self.core().derive_next_version())
    }

    /// Every field covered by the signing root.
    fn signing_fields(&self) -> Vec<(String, Vec<u8>)> {
        let mut fields = self.core().signing_fields();
        fields.push(("kind".to_string(), self.kind().to_string().into_bytes()));
        fields.extend(self.kind_fields());
        fields
    }
}

impl Clone for Box<dyn DocumentModel> {
    fn clone(&self) -> Self {
        self.clone_model()
    }
}
