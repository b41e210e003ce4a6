use async_trait::async_trait;

use crate::domain::{ConnectorDefinition, FeederGate, ManagerError};

/// Durable schedule descriptors keyed by connector name, in their canonical
/// string form.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn get_schedule(&self, connector_name: &str) -> Result<Option<String>, ManagerError>;

    async fn store_schedule(&self, connector_name: &str, schedule: &str)
        -> Result<(), ManagerError>;

    async fn remove_schedule(&self, connector_name: &str) -> Result<(), ManagerError>;

    async fn list_schedules(&self) -> Result<Vec<(String, String)>, ManagerError>;
}

/// Durable traversal checkpoints keyed by connector name. Checkpoints are
/// opaque to everything but the connector.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get_state(&self, connector_name: &str) -> Result<Option<String>, ManagerError>;

    async fn store_state(&self, connector_name: &str, state: &str) -> Result<(), ManagerError>;

    async fn remove_state(&self, connector_name: &str) -> Result<(), ManagerError>;
}

/// Durable connector definitions, used to rebuild the registry on startup.
#[async_trait]
pub trait ConnectorConfigStore: Send + Sync {
    async fn get_definition(
        &self,
        connector_name: &str,
    ) -> Result<Option<ConnectorDefinition>, ManagerError>;

    async fn store_definition(&self, definition: &ConnectorDefinition) -> Result<(), ManagerError>;

    async fn remove_definition(&self, connector_name: &str) -> Result<(), ManagerError>;

    /// Ordered by connector name.
    async fn list_definitions(&self) -> Result<Vec<ConnectorDefinition>, ManagerError>;
}

/// Manager-wide settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn feeder_gate(&self) -> Result<Option<FeederGate>, ManagerError>;

    async fn save_feeder_gate(&self, gate: &FeederGate) -> Result<(), ManagerError>;
}
