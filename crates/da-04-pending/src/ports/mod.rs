//! # Ports Layer
//!
//! - **Inbound (Driving)**: `PendingDocumentApi`
//! - **Outbound (Driven)**: `PendingRepository`

pub mod inbound;
pub mod outbound;
