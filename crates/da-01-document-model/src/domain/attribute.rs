//! # Custom Attributes
//!
//! Labelled values attached to a document. Signed attributes carry a
//! signature binding the value to its signer and to one document version.

use crate::domain::errors::{DocumentError, DocumentResult};
use crate::domain::identifier::DocumentIdentifier;
use crate::domain::signature::Signature;
use serde::{Deserialize, Serialize};
use shared_crypto::{sha256, Sha256Hasher};
use shared_types::{Hash, Identity};
use std::fmt;

/// 32-byte attribute key (`sha256(label)`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttrKey(pub [u8; 32]);

impl AttrKey {
    pub fn from_label(label: &str) -> Self {
        Self(sha256(label.as_bytes()))
    }
}

impl fmt::Debug for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttrKey(0x{})", hex::encode(self.0))
    }
}

/// Attribute signed by an account for one document version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAttribute {
    pub signer: Identity,
    pub document_id: DocumentIdentifier,
    pub version: DocumentIdentifier,
    pub value: Vec<u8>,
    pub signature: Signature,
}

impl SignedAttribute {
    /// The message a signed attribute's signature covers.
    pub fn payload(
        label: &str,
        signer: &Identity,
        document_id: &DocumentIdentifier,
        version: &DocumentIdentifier,
        value: &[u8],
    ) -> Hash {
        let mut hasher = Sha256Hasher::new();
        hasher
            .update_framed(label.as_bytes())
            .update_framed(signer.as_bytes())
            .update_framed(document_id.as_bytes())
            .update_framed(version.as_bytes())
            .update_framed(value);
        hasher.finalize()
    }
}

/// Attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    String(String),
    Integer(i64),
    Bytes(Vec<u8>),
    Signed(SignedAttribute),
}

impl AttrValue {
    /// Tagged byte encoding used in the signing root.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match self {
            AttrValue::String(s) => [&[0u8][..], s.as_bytes()].concat(),
            AttrValue::Integer(i) => [&[1u8][..], &i.to_be_bytes()[..]].concat(),
            AttrValue::Bytes(b) => [&[2u8][..], &b[..]].concat(),
            AttrValue::Signed(s) => {
                let mut out = vec![3u8];
                out.extend_from_slice(s.signer.as_bytes());
                out.extend_from_slice(s.document_id.as_bytes());
                out.extend_from_slice(s.version.as_bytes());
                out.extend_from_slice(&sha256(&s.value));
                out.extend_from_slice(&s.signature.canonical_bytes());
                out
            }
        }
    }
}

/// Labelled attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: AttrKey,
    pub label: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(label: &str, value: AttrValue) -> DocumentResult<Self> {
        if label.trim().is_empty() {
            return Err(DocumentError::InvalidAttribute("empty label".into()));
        }
        Ok(Self {
            key: AttrKey::from_label(label),
            label: label.to_string(),
            value,
        })
    }
}
