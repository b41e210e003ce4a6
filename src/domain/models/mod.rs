mod configure;
mod connector;
mod document;
mod feeder_gate;
mod identity;
mod locale;
mod manager_config;
mod schedule;

pub use configure::*;
pub use connector::*;
pub use document::*;
pub use feeder_gate::*;
pub use identity::*;
pub use locale::*;
pub use manager_config::*;
pub use schedule::*;
