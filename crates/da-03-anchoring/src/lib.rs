//! # Anchoring Subsystem (DA-03)
//!
//! Turns a signed pending document into an anchored one: computes the
//! signing and document roots, collects collaborator signatures, persists
//! the committed document and submits the anchor to the ledger.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): root calculation, ledger types, errors
//! - **Ports Layer** (`ports/`): `DocumentServiceApi` inbound; ledger client,
//!   committed store and transport outbound
//! - **Service Layer** (`service/`): transaction submitter, ledger
//!   connection, anchoring pipeline, document service
//! - **Adapters** (`adapters/`): in-memory store, transport and ledger
//!
//! ## Pipeline
//!
//! ```text
//! validate → signing root → sign → collect signatures → persist (Committing)
//!          → document root → submit anchor (retried) → persist (Anchored) → propagate
//! ```
//!
//! Failure before the anchored write aborts the pipeline with the
//! originating error. Committed writes are keyed by the current version and
//! may be repeated until the version is anchored, so a failed commit can be
//! retried.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryDocumentStore, InMemoryTransport, MockLedgerClient};
pub use domain::errors::{AnchorError, AnchorResult, ConnectionError, StoreError, SubmitError, TransportError};
pub use domain::ledger::{AnchorCommit, LedgerAnchor, LedgerError, TxHandle, NONCE_TOO_LOW, TX_UNDERPRICED};
pub use domain::roots::{document_root, signing_root};
pub use ports::inbound::DocumentServiceApi;
pub use ports::outbound::{CommittedDocumentStore, Envelope, LedgerClient, Transport};
pub use service::connection::{LedgerConfig, LedgerConnection};
pub use service::documents::DocumentService;
pub use service::pipeline::{AnchorReceipt, AnchoringPipeline, PipelineConfig};
pub use service::submitter::{SubmitterConfig, TransactionSubmitter};
