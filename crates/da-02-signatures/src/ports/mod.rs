//! # Ports Layer
//!
//! - **Outbound (Driven)**: identity resolution

pub mod outbound;
