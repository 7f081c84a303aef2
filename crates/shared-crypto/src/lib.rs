//! # Shared Crypto
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Signing roots, document roots, key derivation |
//! | `signatures` | Ed25519 | Collaborator and attribute signatures |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, small signatures, fast verification
//! - **Key generation**: OS CSPRNG only

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

pub use errors::CryptoError;
pub use hashing::{sha256, sha256_many, Sha256Hasher};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
