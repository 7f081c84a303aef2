//! # Domain Layer
//!
//! Pure document logic with no I/O dependencies.

pub mod attribute;
pub mod document;
pub mod errors;
pub mod identifier;
pub mod kinds;
pub mod model;
pub mod payload;
pub mod policy;
pub mod role;
pub mod rule;
pub mod signature;
