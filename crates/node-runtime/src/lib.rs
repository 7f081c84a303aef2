//! # Node Runtime Library
//!
//! Composition root of a DocAnchor node, exposed as a library for tests.
//! The binary entry point is `main.rs`.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment and validate it
//! 2. Derive the node identity and register it with the resolver
//! 3. Connect to the ledger (failure stops start-up)
//! 4. Build the anchoring pipeline, document service and pending service

pub mod container;

pub use container::{ConfigError, ContainerError, NodeConfig, NodeContainer};
