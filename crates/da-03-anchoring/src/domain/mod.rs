//! # Domain Layer

pub mod errors;
pub mod ledger;
pub mod roots;
