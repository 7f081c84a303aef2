//! # Document Errors

use crate::domain::identifier::DocumentIdentifier;
use crate::domain::role::RoleKey;
use crate::domain::rule::{FieldKey, RuleKey, TransitionAction};
use shared_types::{Classify, ErrorClass, Identity};
use thiserror::Error;

/// Errors raised by document mutations and policy checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// Identifier bytes have the wrong width
    #[error("Invalid identifier length: expected {expected}, got {actual}")]
    InvalidIdentifier { expected: usize, actual: usize },

    /// A role with this key already exists
    #[error("Role already exists: {0}")]
    RoleExists(RoleKey),

    /// No role with this key
    #[error("Role not found: {0}")]
    RoleNotFound(RoleKey),

    /// No transition rule with this key
    #[error("Transition rule not found: {0}")]
    RuleNotFound(RuleKey),

    /// Removing collaborators would leave a rule-referenced role empty
    #[error("Role {0} is referenced by a transition rule and would have no collaborators")]
    RoleWouldBeEmpty(RoleKey),

    /// The actor may not perform the action on the field
    #[error("Identity {actor} is not allowed to {action} field {field}")]
    Unauthorized {
        actor: Identity,
        field: FieldKey,
        action: TransitionAction,
    },

    /// Field name not part of this document kind
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Document is being committed or already anchored
    #[error("Document version {0} is immutable")]
    Immutable(DocumentIdentifier),

    /// Document kind does not support field patching
    #[error("Document does not support patching")]
    NotPatchable,

    /// Malformed attribute
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Signing state machine violated (roots or signatures out of order)
    #[error("Invalid signing state: {0}")]
    InvalidSigningState(&'static str),
}

impl Classify for DocumentError {
    fn class(&self) -> ErrorClass {
        match self {
            DocumentError::RoleNotFound(_) | DocumentError::RuleNotFound(_) => ErrorClass::NotFound,
            DocumentError::InvalidSigningState(_) => ErrorClass::ValidationFailure,
            _ => ErrorClass::PolicyViolation,
        }
    }
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
