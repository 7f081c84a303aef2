//! # Pending Lifecycle Errors

use da_01_document_model::{DocumentError, DocumentIdentifier};
use da_03_anchoring::AnchorError;
use shared_types::{Classify, DeadlineExceeded, ErrorClass, Identity};
use thiserror::Error;

/// Pending repository errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("No pending document {document} for account {account}")]
    NotFound {
        account: Identity,
        document: DocumentIdentifier,
    },

    #[error("Pending document {document} already exists for account {account}")]
    AlreadyExists {
        account: Identity,
        document: DocumentIdentifier,
    },

    #[error("Repository backend error: {0}")]
    Backend(String),
}

/// Errors returned by the pending lifecycle service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PendingError {
    /// No authenticated account in the request context
    #[error("No account in request context")]
    ContextMissing,

    #[error("Pending document already exists: {0}")]
    PendingDocumentExists(DocumentIdentifier),

    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentIdentifier),

    #[error("Payload does not name a document")]
    MissingDocumentId,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Anchor(#[from] AnchorError),

    #[error("Pending repository error: {0}")]
    Repository(String),

    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

impl From<RepositoryError> for PendingError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { document, .. } => PendingError::DocumentNotFound(document),
            RepositoryError::AlreadyExists { document, .. } => {
                PendingError::PendingDocumentExists(document)
            }
            RepositoryError::Backend(reason) => PendingError::Repository(reason),
        }
    }
}

impl Classify for PendingError {
    fn class(&self) -> ErrorClass {
        match self {
            PendingError::ContextMissing => ErrorClass::ContextMissing,
            PendingError::PendingDocumentExists(_) | PendingError::MissingDocumentId => {
                ErrorClass::PolicyViolation
            }
            PendingError::DocumentNotFound(_) => ErrorClass::NotFound,
            PendingError::Document(err) => err.class(),
            PendingError::Anchor(err) => err.class(),
            PendingError::Repository(_) => ErrorClass::Fatal,
            PendingError::Deadline(_) => ErrorClass::DeadlineExceeded,
        }
    }
}

pub type PendingResult<T> = Result<T, PendingError>;
