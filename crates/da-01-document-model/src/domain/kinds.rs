//! # Document Kinds
//!
//! | Kind | Patchable | Fields |
//! |------|-----------|--------|
//! | `GenericDocument` | no | attributes only |
//! | `Invoice` | yes | number, currency, amount, payer, payee, due_date |
//! | `PurchaseOrder` | yes | number, currency, amount, supplier, delivery_date |

use crate::domain::document::CoreDocument;
use crate::domain::errors::{DocumentError, DocumentResult};
use crate::domain::model::{DocumentModel, Patchable};
use crate::domain::payload::{CreatePayload, UpdatePayload};
use crate::domain::rule::{FieldKey, TransitionAction};
use serde::{Deserialize, Serialize};
use shared_types::Identity;
use std::collections::BTreeMap;
use std::fmt;

pub const INVOICE_FIELDS: &[&str] = &["number", "currency", "amount", "payer", "payee", "due_date"];

pub const PURCHASE_ORDER_FIELDS: &[&str] =
    &["number", "currency", "amount", "supplier", "delivery_date"];

/// Document kind tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Generic,
    Invoice,
    PurchaseOrder,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentKind::Generic => "generic",
            DocumentKind::Invoice => "invoice",
            DocumentKind::PurchaseOrder => "purchase_order",
        };
        f.write_str(s)
    }
}

/// Build a new document of `payload.kind` authored by `author`.
pub fn new_document(author: Identity, payload: &CreatePayload) -> DocumentResult<Box<dyn DocumentModel>> {
    let core = CoreDocument::new(author, payload.collaborators.iter().copied());
    let mut doc: Box<dyn DocumentModel> = match payload.kind {
        DocumentKind::Generic => Box::new(GenericDocument { core }),
        DocumentKind::Invoice => Box::new(Invoice::from_core(core)),
        DocumentKind::PurchaseOrder => Box::new(PurchaseOrder::from_core(core)),
    };

    let content = CreatePayload {
        collaborators: Vec::new(),
        ..payload.clone()
    };
    if content.fields.is_empty() {
        doc.add_attributes(&author, content.attributes)?;
    } else {
        doc.patch(&author, &UpdatePayload::new_document(content))?;
    }
    Ok(doc)
}

// =============================================================================
// Generic documents
// =============================================================================

/// Document without kind fields; content lives in attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenericDocument {
    core: CoreDocument,
}

impl GenericDocument {
    pub fn new(core: CoreDocument) -> Self {
        Self { core }
    }
}

impl DocumentModel for GenericDocument {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Generic
    }

    fn core(&self) -> &CoreDocument {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CoreDocument {
        &mut self.core
    }

    fn clone_model(&self) -> Box<dyn DocumentModel> {
        Box::new(self.clone())
    }

    fn with_core(&self, core: CoreDocument) -> Box<dyn DocumentModel> {
        Box::new(Self { core })
    }
}

// =============================================================================
// Field documents
// =============================================================================

/// Named string fields restricted to a fixed set of names.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FieldSet {
    allowed: &'static [&'static str],
    values: BTreeMap<String, String>,
}

impl FieldSet {
    fn new(allowed: &'static [&'static str]) -> Self {
        Self {
            allowed,
            values: BTreeMap::new(),
        }
    }

    /// Apply a patch atomically: on any failure neither the core nor the
    /// fields change.
    fn apply(
        &mut self,
        core: &mut CoreDocument,
        actor: &Identity,
        payload: &UpdatePayload,
    ) -> DocumentResult<()> {
        core.ensure_mutable()?;
        let patch = &payload.create;

        if let Some(unknown) = patch.fields.keys().find(|k| !self.allowed.contains(&k.as_str())) {
            return Err(DocumentError::UnknownField(unknown.clone()));
        }

        let mut staged_core = core.clone();
        let mut staged_values = self.values.clone();
        let mut changed = false;

        for (name, value) in &patch.fields {
            let field = FieldKey::named(name);
            if value.is_empty() {
                if staged_values.contains_key(name) {
                    staged_core.require(actor, &field, TransitionAction::Delete)?;
                    staged_values.remove(name);
                    changed = true;
                }
            } else if staged_values.get(name) != Some(value) {
                staged_core.require(actor, &field, TransitionAction::Edit)?;
                staged_values.insert(name.clone(), value.clone());
                changed = true;
            }
        }

        staged_core.add_collaborators(actor, &patch.collaborators)?;
        staged_core.add_attributes(actor, patch.attributes.clone())?;
        if changed {
            staged_core.touch();
        }

        *core = staged_core;
        self.values = staged_values;
        Ok(())
    }

    fn signing_fields(&self) -> Vec<(String, Vec<u8>)> {
        self.values
            .iter()
            .map(|(k, v)| (format!("field:{k}"), v.as_bytes().to_vec()))
            .collect()
    }
}

macro_rules! field_document {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $fields:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            core: CoreDocument,
            fields: FieldSet,
        }

        impl $name {
            pub fn from_core(core: CoreDocument) -> Self {
                Self {
                    core,
                    fields: FieldSet::new($fields),
                }
            }
        }

        impl Patchable for $name {
            fn patch(&mut self, actor: &Identity, payload: &UpdatePayload) -> DocumentResult<()> {
                self.fields.apply(&mut self.core, actor, payload)
            }
        }

        impl DocumentModel for $name {
            fn kind(&self) -> DocumentKind {
                $kind
            }

            fn core(&self) -> &CoreDocument {
                &self.core
            }

            fn core_mut(&mut self) -> &mut CoreDocument {
                &mut self.core
            }

            fn clone_model(&self) -> Box<dyn DocumentModel> {
                Box::new(self.clone())
            }

            fn with_core(&self, core: CoreDocument) -> Box<dyn DocumentModel> {
                Box::new(Self {
                    core,
                    fields: self.fields.clone(),
                })
            }

            fn patcher(&mut self) -> Option<&mut dyn Patchable> {
                Some(self)
            }

            fn kind_fields(&self) -> Vec<(String, Vec<u8>)> {
                self.fields.signing_fields()
            }

            fn field(&self, name: &str) -> Option<&str> {
                self.fields.values.get(name).map(String::as_str)
            }
        }
    };
}

field_document!(
    /// Invoice between a payer and a payee.
    Invoice,
    DocumentKind::Invoice,
    INVOICE_FIELDS
);

field_document!(
    /// Purchase order towards a supplier.
    PurchaseOrder,
    DocumentKind::PurchaseOrder,
    PURCHASE_ORDER_FIELDS
);
