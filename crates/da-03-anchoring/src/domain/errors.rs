//! # Anchoring Errors

use crate::domain::ledger::LedgerError;
use da_01_document_model::{DocumentError, DocumentIdentifier};
use da_02_signatures::SignatureError;
use shared_types::{Classify, DeadlineExceeded, ErrorClass};
use thiserror::Error;

/// Committed document store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Document version not found: {0}")]
    NotFound(DocumentIdentifier),

    /// Anchored versions are immutable
    #[error("Document version already anchored: {0}")]
    AlreadyAnchored(DocumentIdentifier),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl Classify for StoreError {
    fn class(&self) -> ErrorClass {
        match self {
            StoreError::NotFound(_) => ErrorClass::NotFound,
            StoreError::AlreadyAnchored(_) => ErrorClass::PolicyViolation,
            StoreError::Backend(_) => ErrorClass::Fatal,
        }
    }
}

/// Peer transport errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Peer unreachable: {0}")]
    Unreachable(String),

    /// Peer answered but refused the request
    #[error("Peer {peer} rejected request: {reason}")]
    Rejected { peer: String, reason: String },
}

impl Classify for TransportError {
    fn class(&self) -> ErrorClass {
        match self {
            TransportError::Unreachable(_) => ErrorClass::Fatal,
            TransportError::Rejected { .. } => ErrorClass::ValidationFailure,
        }
    }
}

/// Transaction submitter errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Non-retryable ledger failure
    #[error("Ledger call failed: {0}")]
    Ledger(LedgerError),

    #[error("Max concurrent transaction tries reached ({attempts}): {last}")]
    RetriesExhausted { attempts: u32, last: LedgerError },

    /// Deadline passed during an attempt or a back-off sleep
    #[error("Submission cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

impl Classify for SubmitError {
    fn class(&self) -> ErrorClass {
        match self {
            SubmitError::Ledger(err) => err.class(),
            SubmitError::RetriesExhausted { .. } => ErrorClass::LedgerConflict,
            SubmitError::Cancelled { .. } => ErrorClass::DeadlineExceeded,
        }
    }
}

/// Ledger connection errors. Fatal at start-up.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Invalid ledger URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported ledger URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("No ledger account configured")]
    MissingAccount,

    #[error("Ledger node unreachable: {0}")]
    Unreachable(String),
}

impl Classify for ConnectionError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Fatal
    }
}

/// Errors surfaced by the anchoring pipeline and the document service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnchorError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The ledger holds an anchor for the version that the committed
    /// document does not reproduce
    #[error("Ledger anchor for version {0} does not match the committed document")]
    AnchorMismatch(DocumentIdentifier),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

impl Classify for AnchorError {
    fn class(&self) -> ErrorClass {
        match self {
            AnchorError::InvalidDocument(_) => ErrorClass::ValidationFailure,
            AnchorError::AnchorMismatch(_) => ErrorClass::Fatal,
            AnchorError::Document(err) => err.class(),
            AnchorError::Signature(err) => err.class(),
            AnchorError::Store(err) => err.class(),
            AnchorError::Transport(err) => err.class(),
            AnchorError::Submit(err) => err.class(),
            AnchorError::Deadline(_) => ErrorClass::DeadlineExceeded,
        }
    }
}

pub type AnchorResult<T> = Result<T, AnchorError>;
