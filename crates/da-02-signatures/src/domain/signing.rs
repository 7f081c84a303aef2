//! # Signing and Validation
//!
//! One signature per collaborator over the document's signing root.

use crate::domain::errors::SignatureError;
use crate::domain::identity::IdentityConfig;
use crate::ports::outbound::IdentityResolver;
use chrono::Utc;
use da_01_document_model::Signature;
use shared_crypto::{Ed25519PublicKey, Ed25519Signature};
use shared_types::Identity;
use tracing::debug;

/// Sign `payload` with the identity's key, capturing the current UTC time.
pub fn sign(config: &IdentityConfig, payload: &[u8]) -> Signature {
    let signature = config.keys().sign(payload);
    Signature {
        signer: config.identity,
        public_key: config.public_key(),
        bytes: *signature.as_bytes(),
        timestamp: Utc::now(),
    }
}

/// Check the cryptographic signature alone.
pub fn verify_signature(signature: &Signature, message: &[u8]) -> Result<(), SignatureError> {
    let invalid = || SignatureError::InvalidSignature {
        signer: signature.signer,
    };
    let key = Ed25519PublicKey::from_bytes(signature.public_key).map_err(|_| invalid())?;
    key.verify(message, &Ed25519Signature::from_bytes(signature.bytes))
        .map_err(|_| invalid())
}

/// Full validation: signer resolves, key valid at signing time, signature
/// verifies over `message`.
pub async fn validate_signature<R>(
    resolver: &R,
    signature: &Signature,
    message: &[u8],
) -> Result<(), SignatureError>
where
    R: IdentityResolver + ?Sized,
{
    resolver.lookup(&signature.signer).await?;

    let key_valid = resolver
        .validate_key(&signature.signer, &signature.public_key, signature.timestamp)
        .await?;
    if !key_valid {
        debug!(signer = %signature.signer, "signature key not valid at signing time");
        return Err(SignatureError::KeyMismatch {
            signer: signature.signer,
        });
    }

    verify_signature(signature, message)
}

/// Check that `signature` was made by `expected`.
pub fn validate_entity_binding(signature: &Signature, expected: &Identity) -> Result<(), SignatureError> {
    if signature.signer != *expected {
        return Err(SignatureError::SignerMismatch {
            expected: *expected,
            actual: signature.signer,
        });
    }
    Ok(())
}
