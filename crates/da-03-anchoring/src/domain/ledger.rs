//! # Ledger Types
//!
//! The anchor commit call and the errors a ledger node reports for it.

use da_01_document_model::DocumentIdentifier;
use shared_types::{Classify, ErrorClass, Hash, Identity};
use thiserror::Error;

/// Node error for a transaction replacing one with the same nonce.
pub const TX_UNDERPRICED: &str = "replacement transaction underpriced";

/// Node error for a transaction whose nonce was already used.
pub const NONCE_TOO_LOW: &str = "nonce too low";

/// Ledger call anchoring a document version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorCommit {
    /// Version identifier the anchor is recorded under
    pub anchor_id: DocumentIdentifier,
    pub document_root: Hash,
    /// Account that produced the anchoring signature
    pub signer: Identity,
}

/// Handle of a submitted ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxHandle {
    pub tx_hash: Hash,
    pub account: String,
}

/// An anchor the ledger has recorded, with the transaction that wrote it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerAnchor {
    pub commit: AnchorCommit,
    pub tx: TxHandle,
}

/// Errors reported by a ledger node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{}", TX_UNDERPRICED)]
    Underpriced,

    #[error("{}", NONCE_TOO_LOW)]
    NonceTooLow,

    /// Raw node error message
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl LedgerError {
    /// Another transaction from the same account raced this one.
    ///
    /// Raw RPC errors are matched on the exact node message.
    pub fn is_conflict(&self) -> bool {
        match self {
            LedgerError::Underpriced | LedgerError::NonceTooLow => true,
            LedgerError::Rpc(message) => {
                let message = message.trim();
                message == TX_UNDERPRICED || message == NONCE_TOO_LOW
            }
            _ => false,
        }
    }
}

impl Classify for LedgerError {
    fn class(&self) -> ErrorClass {
        if self.is_conflict() {
            ErrorClass::LedgerConflict
        } else {
            ErrorClass::Fatal
        }
    }
}
