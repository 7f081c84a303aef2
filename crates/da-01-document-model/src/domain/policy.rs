//! # Policy Engine
//!
//! Roles plus transition rules, and the `authorize` check run before every
//! field mutation.
//!
//! ## Evaluation
//!
//! - A field/action pair governed by no rule is open to the document's
//!   default members (author and collaborators) and closed to everyone else.
//! - Once a rule governs a field/action pair, the pair becomes allow-listed:
//!   only members of a role named by a governing rule pass.
//! - Rules only grant. Matching rules are OR-ed; any one suffices.

use crate::domain::errors::{DocumentError, DocumentResult};
use crate::domain::role::{Role, RoleKey};
use crate::domain::rule::{FieldKey, RuleKey, TransitionAction, TransitionRule};
use serde::{Deserialize, Serialize};
use shared_types::Identity;
use std::collections::BTreeSet;
use tracing::debug;

/// Roles and transition rules of one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    roles: Vec<Role>,
    rules: Vec<TransitionRule>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    /// Add a role. Fails if a role with the same label already exists.
    pub fn add_role(
        &mut self,
        label: &str,
        collaborators: impl IntoIterator<Item = Identity>,
    ) -> DocumentResult<Role> {
        let role = Role::new(label, collaborators);
        if self.roles.iter().any(|r| r.key == role.key) {
            return Err(DocumentError::RoleExists(role.key));
        }
        self.roles.push(role.clone());
        Ok(role)
    }

    /// Replace a role's collaborator set wholesale.
    ///
    /// A role referenced by a rule cannot be emptied.
    pub fn update_role(
        &mut self,
        key: &RoleKey,
        collaborators: impl IntoIterator<Item = Identity>,
    ) -> DocumentResult<Role> {
        let collaborators: BTreeSet<Identity> = collaborators.into_iter().collect();
        if collaborators.is_empty() && self.rules.iter().any(|rule| rule.roles.contains(key)) {
            return Err(DocumentError::RoleWouldBeEmpty(*key));
        }
        let role = self
            .roles
            .iter_mut()
            .find(|r| r.key == *key)
            .ok_or(DocumentError::RoleNotFound(*key))?;
        role.collaborators = collaborators;
        Ok(role.clone())
    }

    pub fn get_role(&self, key: &RoleKey) -> DocumentResult<&Role> {
        self.roles
            .iter()
            .find(|r| r.key == *key)
            .ok_or(DocumentError::RoleNotFound(*key))
    }

    /// Grant `role` the right to `action` on `field`.
    ///
    /// The role must already exist; on failure the rule set is untouched.
    pub fn add_transition_rule(
        &mut self,
        role: &RoleKey,
        field: FieldKey,
        action: TransitionAction,
    ) -> DocumentResult<TransitionRule> {
        self.get_role(role)?;
        let rule = TransitionRule {
            key: RuleKey::random(),
            roles: vec![*role],
            field,
            action,
        };
        self.rules.push(rule.clone());
        Ok(rule)
    }

    pub fn get_transition_rule(&self, key: &RuleKey) -> DocumentResult<&TransitionRule> {
        self.rules
            .iter()
            .find(|r| r.key == *key)
            .ok_or(DocumentError::RuleNotFound(*key))
    }

    pub fn delete_transition_rule(&mut self, key: &RuleKey) -> DocumentResult<()> {
        let idx = self
            .rules
            .iter()
            .position(|r| r.key == *key)
            .ok_or(DocumentError::RuleNotFound(*key))?;
        self.rules.remove(idx);
        Ok(())
    }

    /// True when at least one rule governs `action` on `field`.
    pub fn governs(&self, field: &FieldKey, action: TransitionAction) -> bool {
        self.rules.iter().any(|r| r.governs(field, action))
    }

    /// Decide whether `actor` may perform `action` on `field`.
    ///
    /// `default_members` is the set allowed on fields no rule governs.
    pub fn authorize(
        &self,
        actor: &Identity,
        field: &FieldKey,
        action: TransitionAction,
        default_members: &BTreeSet<Identity>,
    ) -> bool {
        if !self.governs(field, action) {
            return default_members.contains(actor);
        }

        let allowed = self
            .rules
            .iter()
            .filter(|rule| rule.governs(field, action))
            .flat_map(|rule| rule.roles.iter())
            .filter_map(|key| self.roles.iter().find(|r| r.key == *key))
            .any(|role| role.contains(actor));

        if !allowed {
            debug!(%actor, %field, %action, "no transition rule grants access");
        }
        allowed
    }

    /// Remove identities from every role.
    ///
    /// Fails without mutating if a role referenced by a rule would be left
    /// without collaborators.
    pub fn remove_members(&mut self, identities: &[Identity]) -> DocumentResult<()> {
        let mut roles = self.roles.clone();
        for role in &mut roles {
            role.collaborators.retain(|c| !identities.contains(c));
        }

        for rule in &self.rules {
            for key in &rule.roles {
                let emptied = roles
                    .iter()
                    .any(|r| r.key == *key && r.collaborators.is_empty());
                if emptied {
                    return Err(DocumentError::RoleWouldBeEmpty(*key));
                }
            }
        }

        self.roles = roles;
        Ok(())
    }
}
