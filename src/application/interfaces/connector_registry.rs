use std::sync::Arc;

use async_trait::async_trait;

use crate::application::{AuthenticationManager, AuthorizationManager, ConnectorType};
use crate::domain::{ConfigureResponse, ConnectorConfig, Locale, ManagerError, Schedule};

/// Live connector instances keyed by name, backed by the schedule and
/// traversal-state stores.
///
/// Lookups by connector name fail with `ConnectorNotFound`; lookups by type
/// name fail with `ConnectorTypeNotFound`; instance construction failures
/// surface as `InstantiatorFailure`.
#[async_trait]
pub trait ConnectorRegistry: Send + Sync {
    async fn authentication_manager(
        &self,
        name: &str,
    ) -> Result<Option<Arc<dyn AuthenticationManager>>, ManagerError>;

    async fn authorization_manager(
        &self,
        name: &str,
    ) -> Result<Option<Arc<dyn AuthorizationManager>>, ManagerError>;

    async fn connector_type(&self, type_name: &str) -> Result<Arc<dyn ConnectorType>, ManagerError>;

    async fn connector_type_name(&self, name: &str) -> Result<String, ManagerError>;

    /// Persisted schedule, `None` when the connector has never been scheduled.
    async fn connector_schedule(&self, name: &str) -> Result<Option<Schedule>, ManagerError>;

    /// Writes through to the schedule store before returning.
    async fn set_connector_schedule(&self, name: &str, schedule: &Schedule)
        -> Result<(), ManagerError>;

    async fn connector_names(&self) -> Result<Vec<String>, ManagerError>;

    async fn connector_type_names(&self) -> Result<Vec<String>, ManagerError>;

    async fn connector_config(&self, name: &str) -> Result<ConnectorConfig, ManagerError>;

    async fn config_form_for_connector(
        &self,
        name: &str,
        type_name: &str,
        locale: &Locale,
    ) -> Result<ConfigureResponse, ManagerError>;

    /// Creates (`update == false`) or replaces (`update == true`) a
    /// connector. Returns `Some(form)` when validation rejects the config.
    async fn set_connector_config(
        &self,
        name: &str,
        type_name: &str,
        config: ConnectorConfig,
        locale: &Locale,
        update: bool,
    ) -> Result<Option<ConfigureResponse>, ManagerError>;

    /// Drops the instance along with its persisted schedule and state.
    async fn remove_connector(&self, name: &str) -> Result<(), ManagerError>;

    /// Clears the traversal checkpoint and re-registers the instance.
    async fn restart_connector_traversal(&self, name: &str) -> Result<(), ManagerError>;
}
