//! # Domain Layer

pub mod attribute;
pub mod errors;
pub mod identity;
pub mod signing;
