mod check_feeder_gate;
mod connector_orchestrator;
mod feed_url_resolver;

pub use check_feeder_gate::*;
pub use connector_orchestrator::*;
pub use feed_url_resolver::*;
