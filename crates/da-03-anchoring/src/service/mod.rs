//! # Service Layer

pub mod connection;
pub mod documents;
pub mod pipeline;
pub mod submitter;
