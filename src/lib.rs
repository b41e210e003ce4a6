pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    CheckFeederGateUseCase, ConnectorOrchestrator, ConnectorRegistry, FeedUrlResolver,
    TraversalScheduler,
};

pub use connector::{
    DuckdbConnectorStore, InMemoryConnectorRegistry, InMemoryConnectorStore,
    InMemoryTraversalScheduler, ReqwestHttpClient, SimpleConnectorType,
};

pub use domain::{
    ConnectorConfig, ConnectorStatus, Document, DocumentType, FeedType, ManagerConfig,
    ManagerError, Schedule, SimpleDocument,
};
