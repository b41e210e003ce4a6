//! # Application Layer
//!
//! Collaborator interfaces and the use cases that coordinate them: the
//! connector orchestrator and the feed URL resolver.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
