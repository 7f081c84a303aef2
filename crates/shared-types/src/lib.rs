//! # Shared Types Crate
//!
//! Types every DocAnchor crate agrees on.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities and hashes are defined once here.
//! - **Stable Classification**: every error in the workspace maps to one
//!   [`ErrorClass`] and keeps it when wrapped by an outer layer.
//! - **Cancellable Calls**: every external call runs under a caller supplied
//!   [`Deadline`].

pub mod deadline;
pub mod entities;
pub mod errors;

pub use deadline::{Deadline, DeadlineExceeded};
pub use entities::*;
pub use errors::*;
