use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::{ConnectorConfigStore, ScheduleStore, SettingsRepository, StateStore};
use crate::domain::{ConnectorDefinition, FeederGate, ManagerError};

/// Volatile store for schedules, traversal state, connector definitions and
/// settings. Used by tests and `--memory-storage`.
#[derive(Default)]
pub struct InMemoryConnectorStore {
    schedules: Arc<RwLock<BTreeMap<String, String>>>,
    states: Arc<RwLock<BTreeMap<String, String>>>,
    definitions: Arc<RwLock<BTreeMap<String, ConnectorDefinition>>>,
    feeder_gate: Arc<RwLock<Option<FeederGate>>>,
}

impl InMemoryConnectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleStore for InMemoryConnectorStore {
    async fn get_schedule(&self, connector_name: &str) -> Result<Option<String>, ManagerError> {
        Ok(self.schedules.read().await.get(connector_name).cloned())
    }

    async fn store_schedule(&self, connector_name: &str, schedule: &str) -> Result<(), ManagerError> {
        self.schedules
            .write()
            .await
            .insert(connector_name.to_string(), schedule.to_string());
        debug!("Stored schedule for {} in memory", connector_name);
        Ok(())
    }

    async fn remove_schedule(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.schedules.write().await.remove(connector_name);
        Ok(())
    }

    async fn list_schedules(&self) -> Result<Vec<(String, String)>, ManagerError> {
        Ok(self
            .schedules
            .read()
            .await
            .iter()
            .map(|(name, schedule)| (name.clone(), schedule.clone()))
            .collect())
    }
}

#[async_trait]
impl StateStore for InMemoryConnectorStore {
    async fn get_state(&self, connector_name: &str) -> Result<Option<String>, ManagerError> {
        Ok(self.states.read().await.get(connector_name).cloned())
    }

    async fn store_state(&self, connector_name: &str, state: &str) -> Result<(), ManagerError> {
        self.states
            .write()
            .await
            .insert(connector_name.to_string(), state.to_string());
        Ok(())
    }

    async fn remove_state(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.states.write().await.remove(connector_name);
        Ok(())
    }
}

#[async_trait]
impl ConnectorConfigStore for InMemoryConnectorStore {
    async fn get_definition(
        &self,
        connector_name: &str,
    ) -> Result<Option<ConnectorDefinition>, ManagerError> {
        Ok(self.definitions.read().await.get(connector_name).cloned())
    }

    async fn store_definition(&self, definition: &ConnectorDefinition) -> Result<(), ManagerError> {
        self.definitions
            .write()
            .await
            .insert(definition.name().to_string(), definition.clone());
        Ok(())
    }

    async fn remove_definition(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.definitions.write().await.remove(connector_name);
        Ok(())
    }

    async fn list_definitions(&self) -> Result<Vec<ConnectorDefinition>, ManagerError> {
        Ok(self.definitions.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryConnectorStore {
    async fn feeder_gate(&self) -> Result<Option<FeederGate>, ManagerError> {
        Ok(self.feeder_gate.read().await.clone())
    }

    async fn save_feeder_gate(&self, gate: &FeederGate) -> Result<(), ManagerError> {
        *self.feeder_gate.write().await = Some(gate.clone());
        Ok(())
    }
}
