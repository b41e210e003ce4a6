use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::application::{
    AuthenticationManager, AuthorizationManager, Connector, ConnectorConfigStore,
    ConnectorRegistry, ConnectorType, ScheduleStore, StateStore,
};
use crate::domain::{
    ConfigureResponse, ConnectorConfig, ConnectorDefinition, Locale, ManagerError, Schedule,
};

struct ConnectorInstance {
    type_name: String,
    config: ConnectorConfig,
    connector: Arc<dyn Connector>,
}

/// Registry keeping live connector instances in memory.
///
/// Definitions, schedules and traversal checkpoints are written through to
/// the stores, so [`InMemoryConnectorRegistry::load`] can rebuild the same
/// set of instances in a fresh process.
pub struct InMemoryConnectorRegistry {
    types: BTreeMap<String, Arc<dyn ConnectorType>>,
    instances: RwLock<BTreeMap<String, ConnectorInstance>>,
    schedule_store: Arc<dyn ScheduleStore>,
    state_store: Arc<dyn StateStore>,
    config_store: Arc<dyn ConnectorConfigStore>,
}

impl InMemoryConnectorRegistry {
    pub fn new(
        schedule_store: Arc<dyn ScheduleStore>,
        state_store: Arc<dyn StateStore>,
        config_store: Arc<dyn ConnectorConfigStore>,
    ) -> Self {
        Self {
            types: BTreeMap::new(),
            instances: RwLock::new(BTreeMap::new()),
            schedule_store,
            state_store,
            config_store,
        }
    }

    pub fn with_type(mut self, connector_type: Arc<dyn ConnectorType>) -> Self {
        self.types
            .insert(connector_type.name().to_string(), connector_type);
        self
    }

    /// Re-instantiates every persisted connector definition. Definitions whose
    /// type is unknown or whose instantiation fails are skipped with a
    /// warning. Returns the number of connectors loaded.
    pub async fn load(&self) -> Result<usize, ManagerError> {
        let definitions = self.config_store.list_definitions().await?;
        let mut instances = self.instances.write().await;

        for definition in definitions {
            let connector_type = match self.types.get(definition.type_name()) {
                Some(connector_type) => connector_type,
                None => {
                    warn!(
                        "Skipping connector {}: unknown type {}",
                        definition.name(),
                        definition.type_name()
                    );
                    continue;
                }
            };

            match connector_type
                .instantiate(definition.name(), definition.config())
                .await
            {
                Ok(connector) => {
                    instances.insert(
                        definition.name().to_string(),
                        ConnectorInstance {
                            type_name: definition.type_name().to_string(),
                            config: definition.config().clone(),
                            connector,
                        },
                    );
                }
                Err(e) => warn!("Skipping connector {}: {}", definition.name(), e),
            }
        }

        debug!("Loaded {} connectors", instances.len());
        Ok(instances.len())
    }

    /// Last traversal checkpoint recorded for `name`.
    pub async fn checkpoint(&self, name: &str) -> Result<Option<String>, ManagerError> {
        let instances = self.instances.read().await;
        if !instances.contains_key(name) {
            return Err(ManagerError::connector_not_found(name));
        }
        self.state_store.get_state(name).await
    }

    pub async fn record_checkpoint(&self, name: &str, state: &str) -> Result<(), ManagerError> {
        let instances = self.instances.read().await;
        if !instances.contains_key(name) {
            return Err(ManagerError::connector_not_found(name));
        }
        self.state_store.store_state(name, state).await
    }

    async fn restore_definition(&self, definition: &ConnectorDefinition) {
        if let Err(e) = self.config_store.store_definition(definition).await {
            warn!("Failed to restore definition of {}: {}", definition.name(), e);
        }
    }

    fn lookup_type(&self, type_name: &str) -> Result<Arc<dyn ConnectorType>, ManagerError> {
        self.types
            .get(type_name)
            .cloned()
            .ok_or_else(|| ManagerError::connector_type_not_found(type_name))
    }
}

#[async_trait]
impl ConnectorRegistry for InMemoryConnectorRegistry {
    async fn authentication_manager(
        &self,
        name: &str,
    ) -> Result<Option<Arc<dyn AuthenticationManager>>, ManagerError> {
        let instances = self.instances.read().await;
        let instance = instances
            .get(name)
            .ok_or_else(|| ManagerError::connector_not_found(name))?;
        Ok(instance.connector.authentication_manager())
    }

    async fn authorization_manager(
        &self,
        name: &str,
    ) -> Result<Option<Arc<dyn AuthorizationManager>>, ManagerError> {
        let instances = self.instances.read().await;
        let instance = instances
            .get(name)
            .ok_or_else(|| ManagerError::connector_not_found(name))?;
        Ok(instance.connector.authorization_manager())
    }

    async fn connector_type(&self, type_name: &str) -> Result<Arc<dyn ConnectorType>, ManagerError> {
        self.lookup_type(type_name)
    }

    async fn connector_type_name(&self, name: &str) -> Result<String, ManagerError> {
        self.instances
            .read()
            .await
            .get(name)
            .map(|instance| instance.type_name.clone())
            .ok_or_else(|| ManagerError::connector_not_found(name))
    }

    async fn connector_schedule(&self, name: &str) -> Result<Option<Schedule>, ManagerError> {
        let instances = self.instances.read().await;
        if !instances.contains_key(name) {
            return Err(ManagerError::connector_not_found(name));
        }

        match self.schedule_store.get_schedule(name).await? {
            Some(stored) => stored.parse::<Schedule>().map(Some).map_err(|e| {
                ManagerError::store(format!("Corrupt schedule for connector {}: {}", name, e))
            }),
            None => Ok(None),
        }
    }

    async fn set_connector_schedule(
        &self,
        name: &str,
        schedule: &Schedule,
    ) -> Result<(), ManagerError> {
        if !schedule.is_for(name) {
            return Err(ManagerError::invalid_argument(format!(
                "schedule {} does not belong to connector {}",
                schedule, name
            )));
        }

        // The read guard is held across the write so a concurrent removal
        // cannot leave an orphaned schedule behind.
        let instances = self.instances.read().await;
        if !instances.contains_key(name) {
            return Err(ManagerError::connector_not_found(name));
        }

        self.schedule_store
            .store_schedule(name, &schedule.to_string())
            .await
    }

    async fn connector_names(&self) -> Result<Vec<String>, ManagerError> {
        Ok(self.instances.read().await.keys().cloned().collect())
    }

    async fn connector_type_names(&self) -> Result<Vec<String>, ManagerError> {
        Ok(self.types.keys().cloned().collect())
    }

    async fn connector_config(&self, name: &str) -> Result<ConnectorConfig, ManagerError> {
        self.instances
            .read()
            .await
            .get(name)
            .map(|instance| instance.config.clone())
            .ok_or_else(|| ManagerError::connector_not_found(name))
    }

    async fn config_form_for_connector(
        &self,
        name: &str,
        type_name: &str,
        locale: &Locale,
    ) -> Result<ConfigureResponse, ManagerError> {
        let config = self.connector_config(name).await?;
        let connector_type = self.lookup_type(type_name)?;
        connector_type.populated_config_form(&config, locale).await
    }

    async fn set_connector_config(
        &self,
        name: &str,
        type_name: &str,
        config: ConnectorConfig,
        locale: &Locale,
        update: bool,
    ) -> Result<Option<ConfigureResponse>, ManagerError> {
        let connector_type = self.lookup_type(type_name)?;
        let mut instances = self.instances.write().await;

        match (instances.get(name), update) {
            (None, true) => return Err(ManagerError::connector_not_found(name)),
            (Some(_), false) => {
                return Err(ManagerError::instantiator(format!(
                    "connector {} already exists",
                    name
                )))
            }
            (Some(existing), true) if existing.type_name != type_name => {
                return Err(ManagerError::instantiator(format!(
                    "connector {} is of type {}, not {}",
                    name, existing.type_name, type_name
                )))
            }
            _ => {}
        }

        if let Some(form) = connector_type.validate_config(&config, locale).await? {
            debug!("Configuration for {} failed validation", name);
            return Ok(Some(form));
        }

        let connector = connector_type.instantiate(name, &config).await?;
        self.config_store
            .store_definition(&ConnectorDefinition::new(name, type_name, config.clone()))
            .await?;

        instances.insert(
            name.to_string(),
            ConnectorInstance {
                type_name: type_name.to_string(),
                config,
                connector,
            },
        );

        Ok(None)
    }

    async fn remove_connector(&self, name: &str) -> Result<(), ManagerError> {
        let mut instances = self.instances.write().await;
        let instance = match instances.remove(name) {
            Some(instance) => instance,
            None => {
                debug!("Connector {} is not registered; nothing to remove", name);
                return Ok(());
            }
        };

        // Schedule goes last: a connector that is still registered must keep it.
        let definition =
            ConnectorDefinition::new(name, instance.type_name.as_str(), instance.config.clone());
        let state = match self.state_store.get_state(name).await {
            Ok(state) => state,
            Err(e) => {
                instances.insert(name.to_string(), instance);
                return Err(e);
            }
        };

        if let Err(e) = self.config_store.remove_definition(name).await {
            instances.insert(name.to_string(), instance);
            return Err(e);
        }

        if let Err(e) = self.state_store.remove_state(name).await {
            self.restore_definition(&definition).await;
            instances.insert(name.to_string(), instance);
            return Err(e);
        }

        if let Err(e) = self.schedule_store.remove_schedule(name).await {
            if let Some(state) = state {
                if let Err(restore) = self.state_store.store_state(name, &state).await {
                    warn!("Failed to restore traversal state of {}: {}", name, restore);
                }
            }
            self.restore_definition(&definition).await;
            instances.insert(name.to_string(), instance);
            return Err(e);
        }

        Ok(())
    }

    async fn restart_connector_traversal(&self, name: &str) -> Result<(), ManagerError> {
        let mut instances = self.instances.write().await;
        let instance = instances
            .get_mut(name)
            .ok_or_else(|| ManagerError::connector_not_found(name))?;
        let connector_type = self.lookup_type(&instance.type_name)?;

        self.state_store.remove_state(name).await?;
        instance.connector = connector_type.instantiate(name, &instance.config).await?;

        info!("Traversal state for connector {} cleared", name);
        Ok(())
    }
}
