//! # Connector Layer
//!
//! Integrations implementing the application interfaces:
//! - Stores (DuckDB, in-memory for tests and `--memory-storage`)
//! - Connector registry and traversal scheduler
//! - HTTP exchanges (reqwest)
//! - CLI wiring (container, router, controllers)

pub mod adapter;
pub mod api;

pub use adapter::*;
