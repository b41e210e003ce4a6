mod connector_registry;
mod connector_spi;
mod connector_stores;
mod http_exchange;
mod traversal_scheduler;

pub use connector_registry::*;
pub use connector_spi::*;
pub use connector_stores::*;
pub use http_exchange::*;
pub use traversal_scheduler::*;
