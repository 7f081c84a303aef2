//! # Create / Update Payloads

use crate::domain::attribute::Attribute;
use crate::domain::identifier::DocumentIdentifier;
use crate::domain::kinds::DocumentKind;
use serde::{Deserialize, Serialize};
use shared_types::Identity;
use std::collections::BTreeMap;

/// Content of a new document or of a patch.
///
/// In `fields`, an empty value removes the field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePayload {
    pub kind: DocumentKind,
    pub collaborators: Vec<Identity>,
    pub fields: BTreeMap<String, String>,
    pub attributes: Vec<Attribute>,
}

impl CreatePayload {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            collaborators: Vec::new(),
            fields: BTreeMap::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_collaborators(mut self, collaborators: impl IntoIterator<Item = Identity>) -> Self {
        self.collaborators.extend(collaborators);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Payload addressed at an existing document (or a new one when
/// `document_id` is `None`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub document_id: Option<DocumentIdentifier>,
    pub create: CreatePayload,
}

impl UpdatePayload {
    /// Payload for a brand-new document.
    pub fn new_document(create: CreatePayload) -> Self {
        Self {
            document_id: None,
            create,
        }
    }

    /// Payload addressed at `document_id`.
    pub fn for_document(document_id: DocumentIdentifier, create: CreatePayload) -> Self {
        Self {
            document_id: Some(document_id),
            create,
        }
    }
}
