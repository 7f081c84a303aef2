//! # Core Document
//!
//! State shared by every document kind: version chain, collaborators,
//! access policy, attributes and the signing state.
//!
//! ## Lifecycle
//!
//! ```text
//! Draft ──persist──→ Pending ──commit──→ Committing ──anchor──→ Anchored
//! ```
//!
//! Content mutations are only accepted in `Draft` and `Pending`; each one
//! invalidates the signing root, the document root and collected signatures.

use crate::domain::attribute::{AttrKey, Attribute};
use crate::domain::errors::{DocumentError, DocumentResult};
use crate::domain::identifier::{DocumentIdentifier, VersionChain};
use crate::domain::policy::AccessPolicy;
use crate::domain::role::{Role, RoleKey};
use crate::domain::rule::{FieldKey, RuleKey, TransitionAction, TransitionRule};
use crate::domain::signature::Signature;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Hash, Identity};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Lifecycle status of a document version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Derived in memory, not persisted yet
    Draft,
    /// Held in the pending store, mutable
    Pending,
    /// Signed and persisted to the committed store, awaiting the ledger
    Committing,
    /// Anchored on the ledger; terminal and immutable
    Anchored,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Pending => "pending",
            DocumentStatus::Committing => "committing",
            DocumentStatus::Anchored => "anchored",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDocument {
    chain: VersionChain,
    author: Identity,
    collaborators: BTreeSet<Identity>,
    policy: AccessPolicy,
    attributes: BTreeMap<AttrKey, Attribute>,
    signatures: Vec<Signature>,
    signing_root: Option<Hash>,
    document_root: Option<Hash>,
    status: DocumentStatus,
    timestamp: DateTime<Utc>,
}

impl CoreDocument {
    /// Brand-new document authored by `author`.
    pub fn new(author: Identity, collaborators: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            chain: VersionChain::new(),
            author,
            collaborators: collaborators.into_iter().filter(|c| *c != author).collect(),
            policy: AccessPolicy::new(),
            attributes: BTreeMap::new(),
            signatures: Vec::new(),
            signing_root: None,
            document_root: None,
            status: DocumentStatus::Draft,
            timestamp: Utc::now(),
        }
    }

    /// Copy of this document as its next version.
    ///
    /// Content and policy carry over; signing state is reset and the copy
    /// starts as a `Draft`.
    pub fn derive_next_version(&self) -> Self {
        Self {
            chain: self.chain.derive_next(),
            signatures: Vec::new(),
            signing_root: None,
            document_root: None,
            status: DocumentStatus::Draft,
            timestamp: Utc::now(),
            ..self.clone()
        }
    }

    pub fn chain(&self) -> &VersionChain {
        &self.chain
    }

    pub fn id(&self) -> DocumentIdentifier {
        self.chain.root()
    }

    pub fn current_version(&self) -> DocumentIdentifier {
        self.chain.current()
    }

    pub fn next_version(&self) -> DocumentIdentifier {
        self.chain.next()
    }

    pub fn author(&self) -> Identity {
        self.author
    }

    /// Collaborators other than the author.
    pub fn collaborators(&self) -> &BTreeSet<Identity> {
        &self.collaborators
    }

    /// Author plus collaborators: who may touch fields no rule governs.
    pub fn default_members(&self) -> BTreeSet<Identity> {
        let mut members = self.collaborators.clone();
        members.insert(self.author);
        members
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn attributes(&self) -> &BTreeMap<AttrKey, Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, label: &str) -> Option<&Attribute> {
        self.attributes.get(&AttrKey::from_label(label))
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn signing_root(&self) -> Option<Hash> {
        self.signing_root
    }

    pub fn document_root(&self) -> Option<Hash> {
        self.document_root
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Fail unless content may still change.
    pub fn ensure_mutable(&self) -> DocumentResult<()> {
        match self.status {
            DocumentStatus::Draft | DocumentStatus::Pending => Ok(()),
            DocumentStatus::Committing | DocumentStatus::Anchored => {
                Err(DocumentError::Immutable(self.current_version()))
            }
        }
    }

    /// Record a content change: signing state is stale from here on.
    pub(crate) fn touch(&mut self) {
        self.signatures.clear();
        self.signing_root = None;
        self.document_root = None;
        self.timestamp = Utc::now();
    }

    // =========================================================================
    // Policy
    // =========================================================================

    pub fn authorize(&self, actor: &Identity, field: &FieldKey, action: TransitionAction) -> bool {
        self.policy
            .authorize(actor, field, action, &self.default_members())
    }

    /// Fail with `Unauthorized` unless `actor` may perform `action` on `field`.
    pub fn require(
        &self,
        actor: &Identity,
        field: &FieldKey,
        action: TransitionAction,
    ) -> DocumentResult<()> {
        if self.authorize(actor, field, action) {
            return Ok(());
        }
        Err(DocumentError::Unauthorized {
            actor: *actor,
            field: field.clone(),
            action,
        })
    }

    pub fn add_role(&mut self, label: &str, collaborators: &[Identity]) -> DocumentResult<Role> {
        self.ensure_mutable()?;
        let role = self.policy.add_role(label, collaborators.iter().copied())?;
        self.touch();
        Ok(role)
    }

    pub fn update_role(&mut self, key: &RoleKey, collaborators: &[Identity]) -> DocumentResult<Role> {
        self.ensure_mutable()?;
        let role = self.policy.update_role(key, collaborators.iter().copied())?;
        self.touch();
        Ok(role)
    }

    pub fn get_role(&self, key: &RoleKey) -> DocumentResult<Role> {
        self.policy.get_role(key).cloned()
    }

    pub fn add_transition_rule(
        &mut self,
        role: &RoleKey,
        field: FieldKey,
        action: TransitionAction,
    ) -> DocumentResult<TransitionRule> {
        self.ensure_mutable()?;
        let rule = self.policy.add_transition_rule(role, field, action)?;
        self.touch();
        Ok(rule)
    }

    pub fn get_transition_rule(&self, key: &RuleKey) -> DocumentResult<TransitionRule> {
        self.policy.get_transition_rule(key).cloned()
    }

    pub fn delete_transition_rule(&mut self, key: &RuleKey) -> DocumentResult<()> {
        self.ensure_mutable()?;
        self.policy.delete_transition_rule(key)?;
        self.touch();
        Ok(())
    }

    /// Add collaborators; gated on the `collaborators` field.
    pub fn add_collaborators(&mut self, actor: &Identity, identities: &[Identity]) -> DocumentResult<()> {
        self.ensure_mutable()?;
        let fresh: Vec<Identity> = identities
            .iter()
            .copied()
            .filter(|i| *i != self.author && !self.collaborators.contains(i))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }
        self.require(actor, &FieldKey::named("collaborators"), TransitionAction::Edit)?;
        self.collaborators.extend(fresh);
        self.touch();
        Ok(())
    }

    /// Drop identities from the collaborator set and from every role.
    pub fn remove_collaborators(&mut self, identities: &[Identity]) -> DocumentResult<()> {
        self.ensure_mutable()?;
        self.policy.remove_members(identities)?;
        self.collaborators.retain(|c| !identities.contains(c));
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Insert or replace attributes. Every attribute is authorized before
    /// any is written.
    pub fn add_attributes(&mut self, actor: &Identity, attributes: Vec<Attribute>) -> DocumentResult<()> {
        self.ensure_mutable()?;
        for attr in &attributes {
            self.require(actor, &FieldKey::attribute(&attr.key), TransitionAction::Edit)?;
        }
        if attributes.is_empty() {
            return Ok(());
        }
        for attr in attributes {
            self.attributes.insert(attr.key, attr);
        }
        self.touch();
        Ok(())
    }

    pub fn delete_attribute(&mut self, actor: &Identity, label: &str) -> DocumentResult<()> {
        self.ensure_mutable()?;
        let key = AttrKey::from_label(label);
        if !self.attributes.contains_key(&key) {
            return Err(DocumentError::InvalidAttribute(format!("no attribute {label}")));
        }
        self.require(actor, &FieldKey::attribute(&key), TransitionAction::Delete)?;
        self.attributes.remove(&key);
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Signing
    // =========================================================================

    /// Start a signature round over `root`. Clears earlier signatures.
    pub fn set_signing_root(&mut self, root: Hash) {
        self.signatures.clear();
        self.document_root = None;
        self.signing_root = Some(root);
    }

    /// Append a signature collected in the current round.
    pub fn append_signature(&mut self, signature: Signature) -> DocumentResult<()> {
        if self.signing_root.is_none() {
            return Err(DocumentError::InvalidSigningState("no signing root"));
        }
        if self.document_root.is_some() {
            return Err(DocumentError::InvalidSigningState("document root already set"));
        }
        self.signatures.push(signature);
        Ok(())
    }

    /// Fix the document root. Only once, and only over a non-empty round.
    pub fn set_document_root(&mut self, root: Hash) -> DocumentResult<()> {
        if self.signing_root.is_none() {
            return Err(DocumentError::InvalidSigningState("no signing root"));
        }
        if self.signatures.is_empty() {
            return Err(DocumentError::InvalidSigningState("no signatures"));
        }
        if self.document_root.is_some() {
            return Err(DocumentError::InvalidSigningState("document root already set"));
        }
        self.document_root = Some(root);
        Ok(())
    }

    pub fn mark_pending(&mut self) -> DocumentResult<()> {
        self.ensure_mutable()?;
        self.status = DocumentStatus::Pending;
        Ok(())
    }

    pub fn mark_committing(&mut self) -> DocumentResult<()> {
        self.ensure_mutable()?;
        if self.signing_root.is_none() || self.signatures.is_empty() {
            return Err(DocumentError::InvalidSigningState("unsigned document"));
        }
        self.status = DocumentStatus::Committing;
        Ok(())
    }

    pub fn mark_anchored(&mut self) -> DocumentResult<()> {
        if self.status != DocumentStatus::Committing || self.document_root.is_none() {
            return Err(DocumentError::InvalidSigningState("document root not computed"));
        }
        self.status = DocumentStatus::Anchored;
        Ok(())
    }

    /// Content fields covered by the signing root, as `(name, bytes)` pairs.
    pub fn signing_fields(&self) -> Vec<(String, Vec<u8>)> {
        let mut fields = vec![
            ("document_identifier".to_string(), self.chain.root().0.to_vec()),
            ("current_version".to_string(), self.chain.current().0.to_vec()),
            ("next_version".to_string(), self.chain.next().0.to_vec()),
            ("author".to_string(), self.author.0.to_vec()),
            (
                "collaborators".to_string(),
                self.collaborators.iter().flat_map(|c| c.0).collect(),
            ),
        ];
        if let Some(previous) = self.chain.previous() {
            fields.push(("previous_version".to_string(), previous.0.to_vec()));
        }
        for role in self.policy.roles() {
            let mut bytes = role.label.as_bytes().to_vec();
            bytes.extend(role.collaborators.iter().flat_map(|c| c.0));
            fields.push((format!("role:{}", role.key), bytes));
        }
        for rule in self.policy.rules() {
            let mut bytes = rule.field.as_bytes().to_vec();
            bytes.push(rule.action as u8);
            bytes.extend(rule.roles.iter().flat_map(|r| r.0));
            fields.push((format!("rule:{}", rule.key), bytes));
        }
        for (key, attr) in &self.attributes {
            fields.push((
                format!("attribute:{}", hex::encode(key.0)),
                attr.value.canonical_bytes(),
            ));
        }
        fields
    }
}
