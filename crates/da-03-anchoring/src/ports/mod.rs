//! # Ports Layer
//!
//! - **Inbound (Driving)**: `DocumentServiceApi`
//! - **Outbound (Driven)**: ledger client, committed store, transport

pub mod inbound;
pub mod outbound;
