//! # Signature Errors

use crate::ports::outbound::ResolverError;
use shared_types::{Classify, ErrorClass, Identity};
use thiserror::Error;

/// Errors that can occur while producing or validating signatures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Cryptographic verification failed
    #[error("Invalid signature from {signer}")]
    InvalidSignature { signer: Identity },

    /// The embedded signer identity does not resolve
    #[error("Unknown signer: {0}")]
    UnknownSigner(Identity),

    /// The embedded public key was not valid for the signer at signing time
    #[error("Public key not valid for {signer} at signing time")]
    KeyMismatch { signer: Identity },

    /// Signature was made by someone other than the expected signer
    #[error("Signer mismatch: expected {expected}, got {actual}")]
    SignerMismatch { expected: Identity, actual: Identity },

    /// The identity resolver could not be reached
    #[error("Identity resolver unavailable: {0}")]
    ResolverUnavailable(String),
}

impl From<ResolverError> for SignatureError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::NotFound(identity) => SignatureError::UnknownSigner(identity),
            ResolverError::Unavailable(reason) => SignatureError::ResolverUnavailable(reason),
        }
    }
}

impl Classify for SignatureError {
    fn class(&self) -> ErrorClass {
        match self {
            SignatureError::ResolverUnavailable(_) => ErrorClass::Fatal,
            _ => ErrorClass::ValidationFailure,
        }
    }
}
