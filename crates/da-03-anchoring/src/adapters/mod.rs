//! # Adapters Module
//!
//! In-memory implementations of the outbound ports, used by the node
//! runtime and by tests.

mod ledger;
mod store;
mod transport;

pub use ledger::MockLedgerClient;
pub use store::InMemoryDocumentStore;
pub use transport::InMemoryTransport;
