use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::application::{
    CheckFeederGateUseCase, ConnectorConfigStore, ConnectorOrchestrator, FeedUrlResolver,
    HttpClient, ScheduleStore, SettingsRepository, StateStore, TraversalScheduler,
};
use crate::connector::adapter::{
    DuckdbConnectorStore, InMemoryConnectorRegistry, InMemoryConnectorStore,
    InMemoryTraversalScheduler, ReqwestHttpClient, SimpleConnectorType,
};
use crate::domain::{FeedType, ManagerConfig};

pub const DATABASE_FILE: &str = "connector-manager.duckdb";

pub struct ContainerConfig {
    pub data_dir: String,
    pub memory_storage: bool,
    pub content_url_prefix: Option<String>,
    pub feed_type: Option<String>,
}

struct Stores {
    schedules: Arc<dyn ScheduleStore>,
    states: Arc<dyn StateStore>,
    definitions: Arc<dyn ConnectorConfigStore>,
    settings: Arc<dyn SettingsRepository>,
}

impl Stores {
    fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: ScheduleStore + StateStore + ConnectorConfigStore + SettingsRepository + 'static,
    {
        Self {
            schedules: store.clone(),
            states: store.clone(),
            definitions: store.clone(),
            settings: store,
        }
    }
}

pub struct Container {
    registry: Arc<InMemoryConnectorRegistry>,
    scheduler: Arc<InMemoryTraversalScheduler>,
    settings: Arc<dyn SettingsRepository>,
    http_client: Arc<dyn HttpClient>,
    manager_config: ManagerConfig,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let stores = if config.memory_storage {
            debug!("Using in-memory connector storage");
            Stores::from_shared(Arc::new(InMemoryConnectorStore::new()))
        } else {
            let db_path = PathBuf::from(&config.data_dir).join(DATABASE_FILE);
            debug!("Using DuckDB connector storage at {:?}", db_path);
            Stores::from_shared(Arc::new(DuckdbConnectorStore::new(&db_path)?))
        };

        let registry = builtin_connector_types().into_iter().fold(
            InMemoryConnectorRegistry::new(
                stores.schedules.clone(),
                stores.states,
                stores.definitions,
            ),
            |registry, connector_type| registry.with_type(Arc::new(connector_type)),
        );
        let loaded = registry.load().await?;
        debug!("Restored {} connectors", loaded);

        let scheduler = InMemoryTraversalScheduler::new(stores.schedules);
        scheduler.refresh().await?;

        let mut manager_config = ManagerConfig::new();
        if let Some(prefix) = config.content_url_prefix.as_deref() {
            manager_config = manager_config.with_content_url_prefix(prefix);
        }
        if let Some(feed_type) = config.feed_type.as_deref() {
            let feed_type = feed_type.parse::<FeedType>().map_err(|e| anyhow!(e))?;
            manager_config = manager_config.with_default_feed_type(feed_type);
        }

        Ok(Self {
            registry: Arc::new(registry),
            scheduler: Arc::new(scheduler),
            settings: stores.settings,
            http_client: Arc::new(ReqwestHttpClient::new()),
            manager_config,
            config,
        })
    }

    pub fn orchestrator(&self) -> ConnectorOrchestrator {
        ConnectorOrchestrator::new(
            self.registry.clone(),
            self.scheduler.clone(),
            self.settings.clone(),
        )
    }

    pub fn feed_url_resolver(&self, data_source: &str) -> FeedUrlResolver {
        FeedUrlResolver::from_config(data_source, &self.manager_config)
    }

    pub fn check_feeder_gate_use_case(&self, proxy: Option<String>) -> CheckFeederGateUseCase {
        let use_case = CheckFeederGateUseCase::new(self.settings.clone(), self.http_client.clone());

        match proxy {
            Some(proxy) => use_case.with_proxy(proxy),
            None => use_case,
        }
    }

    pub fn scheduler(&self) -> Arc<InMemoryTraversalScheduler> {
        self.scheduler.clone()
    }

    pub fn manager_config(&self) -> &ManagerConfig {
        &self.manager_config
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }
}

/// Connector types available without plugins.
pub fn builtin_connector_types() -> Vec<SimpleConnectorType> {
    vec![
        SimpleConnectorType::new("filesystem")
            .with_required_key("root")
            .with_optional_key("include_patterns")
            .with_optional_key("exclude_patterns"),
        SimpleConnectorType::new("database")
            .with_required_key("url")
            .with_required_key("query")
            .with_optional_key("user")
            .with_optional_key("password"),
        SimpleConnectorType::new("web")
            .with_required_key("start_url")
            .with_optional_key("max_depth"),
    ]
}
