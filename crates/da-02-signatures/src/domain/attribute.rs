//! # Signed Attributes
//!
//! Attributes whose value is signed by the acting account for a specific
//! document version.

use crate::domain::errors::SignatureError;
use crate::domain::identity::IdentityConfig;
use crate::domain::signing::{sign, validate_signature};
use crate::ports::outbound::IdentityResolver;
use da_01_document_model::{AttrValue, Attribute, DocumentIdentifier, DocumentResult, SignedAttribute};

/// Build a signed attribute for `version` of `document_id`.
pub fn new_signed_attribute(
    label: &str,
    config: &IdentityConfig,
    document_id: DocumentIdentifier,
    version: DocumentIdentifier,
    value: &[u8],
) -> DocumentResult<Attribute> {
    let payload = SignedAttribute::payload(label, &config.identity, &document_id, &version, value);
    let signed = SignedAttribute {
        signer: config.identity,
        document_id,
        version,
        value: value.to_vec(),
        signature: sign(config, &payload),
    };
    Attribute::new(label, AttrValue::Signed(signed))
}

/// Validate the signature of a signed attribute. Unsigned attributes pass.
pub async fn verify_signed_attribute<R>(resolver: &R, attribute: &Attribute) -> Result<(), SignatureError>
where
    R: IdentityResolver + ?Sized,
{
    let AttrValue::Signed(signed) = &attribute.value else {
        return Ok(());
    };
    if signed.signature.signer != signed.signer {
        return Err(SignatureError::SignerMismatch {
            expected: signed.signer,
            actual: signed.signature.signer,
        });
    }
    let payload = SignedAttribute::payload(
        &attribute.label,
        &signed.signer,
        &signed.document_id,
        &signed.version,
        &signed.value,
    );
    validate_signature(resolver, &signed.signature, &payload).await
}
