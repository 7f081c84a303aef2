//! # Adapters Module
//!
//! Implementations of the outbound ports.

mod memory;

pub use memory::InMemoryIdentityResolver;
