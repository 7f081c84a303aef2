//! # Error Classification
//!
//! Every error enum in the workspace maps onto one of these classes. Outer
//! layers may wrap an error to add context but must report the class of the
//! error they wrap.

use std::fmt;

/// Coarse error taxonomy shared by all subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// No authenticated account in the call context. Always surfaced.
    ContextMissing,
    /// Document, role, rule or version absent.
    NotFound,
    /// Unauthorized mutation, duplicate pending create, bad role/rule reference.
    PolicyViolation,
    /// Signature or identity mismatch.
    ValidationFailure,
    /// Ledger conflict that outlived the retry budget.
    LedgerConflict,
    /// The caller's deadline passed before the operation completed.
    DeadlineExceeded,
    /// Connection or initialization failure.
    Fatal,
}

impl ErrorClass {
    /// Whether a caller may reasonably retry the whole operation later.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorClass::LedgerConflict | ErrorClass::DeadlineExceeded)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::ContextMissing => "context-missing",
            ErrorClass::NotFound => "not-found",
            ErrorClass::PolicyViolation => "policy-violation",
            ErrorClass::ValidationFailure => "validation-failure",
            ErrorClass::LedgerConflict => "ledger-conflict",
            ErrorClass::DeadlineExceeded => "deadline-exceeded",
            ErrorClass::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Implemented by every error enum so callers can branch on the class
/// without matching concrete variants.
pub trait Classify {
    /// The class of this error.
    fn class(&self) -> ErrorClass;
}
