//! # Adapters Module

mod memory;

pub use memory::InMemoryPendingRepository;
