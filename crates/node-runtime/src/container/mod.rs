//! # Node Container
//!
//! Holds the subsystem instances of a node, wired through their ports.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, IdentitySettings, NodeConfig, RequestSettings};
pub use subsystems::{ContainerError, NodeContainer};
