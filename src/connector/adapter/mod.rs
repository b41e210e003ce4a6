mod duckdb_connector_store;
mod in_memory_connector_registry;
mod in_memory_connector_store;
mod in_memory_traversal_scheduler;
mod reqwest_http_exchange;
mod simple_connector_type;

pub use duckdb_connector_store::*;
pub use in_memory_connector_registry::*;
pub use in_memory_connector_store::*;
pub use in_memory_traversal_scheduler::*;
pub use reqwest_http_exchange::*;
pub use simple_connector_type::*;
