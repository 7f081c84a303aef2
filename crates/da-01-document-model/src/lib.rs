//! # Document Model (DA-01)
//!
//! Versioned document identity and the field-level write policy evaluated
//! on every mutation.
//!
//! ## Architecture
//!
//! Pure domain crate, no I/O:
//! - `domain::identifier`: root/current/next version chain
//! - `domain::policy`: roles, transition rules, `authorize`
//! - `domain::document`: the core document every kind embeds
//! - `domain::kinds`: generic documents, invoices, purchase orders
//! - `domain::model`: the `DocumentModel` capability trait the lifecycle
//!   service works through
//!
//! ## Invariants
//!
//! - The root identifier never changes once assigned.
//! - Each derived version takes the previous `next` as its `current`.
//! - A transition rule only ever references an existing role.
//! - Anchored documents are immutable; changes require a new version.

pub mod domain;

pub use domain::attribute::{AttrKey, AttrValue, Attribute, SignedAttribute};
pub use domain::document::{CoreDocument, DocumentStatus};
pub use domain::errors::{DocumentError, DocumentResult};
pub use domain::identifier::{DocumentIdentifier, VersionChain, IDENTIFIER_LENGTH};
pub use domain::kinds::{new_document, DocumentKind, GenericDocument, Invoice, PurchaseOrder};
pub use domain::model::{DocumentModel, Patchable};
pub use domain::payload::{CreatePayload, UpdatePayload};
pub use domain::policy::AccessPolicy;
pub use domain::role::{Role, RoleKey};
pub use domain::rule::{FieldKey, RuleKey, TransitionAction, TransitionRule};
pub use domain::signature::Signature;
