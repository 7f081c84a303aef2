//! # DocAnchor Test Suite
//!
//! Cross-subsystem tests run against a fully wired node.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs     # Node with extra accounts on the in-memory network
//!     ├── flows.rs       # Pending → anchored lifecycle through PendingService
//!     └── properties.rs  # Versioning, policy, signing and retry properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p da-tests
//! cargo test -p da-tests integration::flows::
//! ```

pub mod integration;
