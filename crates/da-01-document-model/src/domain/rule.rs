//! # Transition Rules
//!
//! A rule grants the members of one or more roles the right to perform an
//! action on one field.

use crate::domain::attribute::AttrKey;
use crate::domain::role::RoleKey;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

const NAMED_PREFIX: &[u8] = b"field:";
const ATTRIBUTE_PREFIX: &[u8] = b"attr:";

/// 32-byte rule identifier, random per rule.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleKey(pub [u8; 32]);

impl RuleKey {
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleKey({self})")
    }
}

/// Action a rule grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionAction {
    Edit,
    Delete,
}

impl fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionAction::Edit => f.write_str("edit"),
            TransitionAction::Delete => f.write_str("delete"),
        }
    }
}

/// Field a rule governs: a named document field or a custom attribute.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey(Vec<u8>);

impl FieldKey {
    /// Key of a named field of the document kind (e.g. `amount`).
    pub fn named(name: &str) -> Self {
        Self([NAMED_PREFIX, name.as_bytes()].concat())
    }

    /// Key of a custom attribute.
    pub fn attribute(key: &AttrKey) -> Self {
        Self([ATTRIBUTE_PREFIX, key.0.as_slice()].concat())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.0.strip_prefix(NAMED_PREFIX) {
            write!(f, "{}", String::from_utf8_lossy(name))
        } else if let Some(key) = self.0.strip_prefix(ATTRIBUTE_PREFIX) {
            write!(f, "attribute:0x{}", hex::encode(key))
        } else {
            write!(f, "0x{}", hex::encode(&self.0))
        }
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldKey({self})")
    }
}

/// Policy statement: members of `roles` may perform `action` on `field`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRule {
    pub key: RuleKey,
    pub roles: Vec<RoleKey>,
    pub field: FieldKey,
    pub action: TransitionAction,
}

impl TransitionRule {
    /// True when this rule is about `action` on `field`.
    pub fn governs(&self, field: &FieldKey, action: TransitionAction) -> bool {
        self.field == *field && self.action == action
    }
}
