//! # Signature Subsystem (DA-02)
//!
//! Produces and verifies detached Ed25519 signatures over a document's
//! signing root, and binds signatures to the identities that made them.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): signing, validation, signed attributes
//! - **Ports Layer** (`ports/`): the identity resolver this crate depends on
//! - **Adapters** (`adapters/`): in-memory identity resolver
//!
//! ## Validation Order
//!
//! 1. Signer identity must resolve (`UnknownSigner`)
//! 2. Embedded key must be valid for the signer at signing time (`KeyMismatch`)
//! 3. Signature must verify over the message (`InvalidSignature`)

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryIdentityResolver;
pub use domain::attribute::{new_signed_attribute, verify_signed_attribute};
pub use domain::errors::SignatureError;
pub use domain::identity::IdentityConfig;
pub use domain::signing::{sign, validate_entity_binding, validate_signature, verify_signature};
pub use ports::outbound::{IdentityRecord, IdentityResolver, KeyRecord, ResolverError};
