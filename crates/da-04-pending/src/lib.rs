//! # Pending Lifecycle Service (DA-04)
//!
//! Owns pending documents while they are drafts: every mutation goes
//! through the document's access policy, and `commit` hands the document to
//! the anchoring pipeline and removes the pending record once it is
//! anchored.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): request context, errors
//! - **Ports Layer** (`ports/`): `PendingDocumentApi` inbound,
//!   `PendingRepository` outbound
//! - **Service Layer** (`service.rs`): `PendingService`
//! - **Adapters** (`adapters/`): in-memory pending repository
//!
//! ## State Machine
//!
//! ```text
//! create ──→ Pending ──commit──→ Anchored (pending record deleted)
//!              │  ↑
//!              └──┘ update / roles / rules / attributes
//! ```
//!
//! ## Lookup Fallback
//!
//! Reads try the account's pending store first. A request without an
//! account fails with `ContextMissing` at once; any other pending miss falls
//! back to the committed store.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryPendingRepository;
pub use domain::context::RequestContext;
pub use domain::errors::{PendingError, PendingResult, RepositoryError};
pub use ports::inbound::{PendingDocumentApi, RuleRequest};
pub use ports::outbound::PendingRepository;
pub use service::PendingService;
