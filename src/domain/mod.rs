//! # Domain Layer
//!
//! Connector, schedule, identity and document models plus the error taxonomy.
//! This layer is independent of storage, scheduling and transport.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
