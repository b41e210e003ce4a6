use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ConnectorRegistry, ConnectorType, SettingsRepository, TraversalScheduler};
use crate::domain::{
    AuthenticationIdentity, AuthenticationResponse, ConfigureResponse, ConnectorConfig,
    ConnectorStatus, FeederGate, Locale, ManagerError, Schedule,
};

/// Single entry point for authentication, authorization, configuration and
/// connector lifecycle.
///
/// Keeps the registry (and the stores behind it) consistent with the
/// traversal scheduler. No global lock is taken; each operation is ordered
/// so that the scheduler may briefly hold a connector the registry is about
/// to discard, never the reverse.
pub struct ConnectorOrchestrator {
    registry: Arc<dyn ConnectorRegistry>,
    scheduler: Arc<dyn TraversalScheduler>,
    settings: Arc<dyn SettingsRepository>,
}

impl ConnectorOrchestrator {
    pub fn new(
        registry: Arc<dyn ConnectorRegistry>,
        scheduler: Arc<dyn TraversalScheduler>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            registry,
            scheduler,
            settings,
        }
    }

    /// Fail-closed: every failure is logged and reported as `false`.
    pub async fn authenticate(&self, connector_name: &str, identity: &AuthenticationIdentity) -> bool {
        match self.try_authenticate(connector_name, identity).await {
            Ok(response) => response.is_valid(),
            Err(e) => {
                log_access_failure(connector_name, &e);
                false
            }
        }
    }

    async fn try_authenticate(
        &self,
        connector_name: &str,
        identity: &AuthenticationIdentity,
    ) -> Result<AuthenticationResponse, ManagerError> {
        match self.registry.authentication_manager(connector_name).await? {
            Some(manager) => manager.authenticate(identity).await,
            None => {
                debug!(
                    "Connector {} does not implement authentication",
                    connector_name
                );
                Ok(AuthenticationResponse::invalid())
            }
        }
    }

    /// Returns the subset of `docids` the user may see. Fail-closed: any
    /// failure yields an empty set.
    pub async fn authorize_documents(
        &self,
        connector_name: &str,
        docids: &[String],
        username: &str,
    ) -> HashSet<String> {
        match self.try_authorize(connector_name, docids, username).await {
            Ok(authorized) => authorized,
            Err(e) => {
                log_access_failure(connector_name, &e);
                HashSet::new()
            }
        }
    }

    async fn try_authorize(
        &self,
        connector_name: &str,
        docids: &[String],
        username: &str,
    ) -> Result<HashSet<String>, ManagerError> {
        let manager = match self.registry.authorization_manager(connector_name).await? {
            Some(manager) => manager,
            None => {
                warn!(
                    "Connector {} does not implement authorization; denying {} documents",
                    connector_name,
                    docids.len()
                );
                return Ok(HashSet::new());
            }
        };

        let identity = AuthenticationIdentity::new(username);
        let responses = manager.authorize_docids(docids, &identity).await?;

        Ok(responses
            .into_iter()
            .filter(|response| response.is_valid())
            .map(|response| response.into_docid())
            .collect())
    }

    pub async fn get_config_form(
        &self,
        connector_type_name: &str,
        language: &str,
    ) -> Result<ConfigureResponse, ManagerError> {
        let connector_type = self.registry.connector_type(connector_type_name).await?;
        let locale = Locale::from_language_tag(language);
        connector_type.config_form(&locale).await
    }

    pub async fn get_config_form_for_connector(
        &self,
        connector_name: &str,
        language: &str,
    ) -> Result<ConfigureResponse, ManagerError> {
        let type_name = self.registry.connector_type_name(connector_name).await?;
        let locale = Locale::from_language_tag(language);
        self.registry
            .config_form_for_connector(connector_name, &type_name, &locale)
            .await
    }

    /// Fails with `InvalidArgument` when the connector is not registered.
    pub async fn get_connector_status(
        &self,
        connector_name: &str,
    ) -> Result<ConnectorStatus, ManagerError> {
        match self.lookup_status(connector_name).await {
            Err(ManagerError::ConnectorNotFound(name)) => {
                warn!("Connector {} not found for status query", name);
                Err(ManagerError::invalid_argument(format!(
                    "no connector named {}",
                    name
                )))
            }
            other => other,
        }
    }

    async fn lookup_status(&self, connector_name: &str) -> Result<ConnectorStatus, ManagerError> {
        let type_name = self.registry.connector_type_name(connector_name).await?;
        let schedule = self.registry.connector_schedule(connector_name).await?;
        Ok(ConnectorStatus::new(connector_name, type_name, schedule))
    }

    /// Statuses in registry enumeration order. Connectors removed between
    /// enumeration and lookup are left out.
    pub async fn list_connector_statuses(&self) -> Result<Vec<ConnectorStatus>, ManagerError> {
        let names = self.registry.connector_names().await?;
        let lookups =
            futures_util::future::join_all(names.iter().map(|name| self.lookup_status(name))).await;

        let mut statuses = Vec::with_capacity(names.len());
        for (name, lookup) in names.iter().zip(lookups) {
            match lookup {
                Ok(status) => statuses.push(status),
                Err(ManagerError::ConnectorNotFound(_)) => {
                    debug!("Connector {} removed while listing statuses", name);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(statuses)
    }

    pub async fn list_connector_type_names(&self) -> Result<BTreeSet<String>, ManagerError> {
        Ok(self
            .registry
            .connector_type_names()
            .await?
            .into_iter()
            .collect())
    }

    pub async fn get_connector_type(
        &self,
        type_name: &str,
    ) -> Result<Arc<dyn ConnectorType>, ManagerError> {
        self.registry.connector_type(type_name).await
    }

    /// `Ok(Some(form))` carries validation errors for the operator;
    /// `Ok(None)` means the configuration was accepted.
    pub async fn set_connector_config(
        &self,
        connector_name: &str,
        connector_type_name: &str,
        config: ConnectorConfig,
        language: &str,
        update: bool,
    ) -> Result<Option<ConfigureResponse>, ManagerError> {
        let locale = Locale::from_language_tag(language);
        let response = self
            .registry
            .set_connector_config(connector_name, connector_type_name, config, &locale, update)
            .await?;

        match &response {
            Some(form) => info!(
                "Configuration for connector {} rejected: {}",
                connector_name,
                form.message().unwrap_or_default()
            ),
            None => info!(
                "Configuration for connector {} ({}) {}",
                connector_name,
                connector_type_name,
                if update { "updated" } else { "created" }
            ),
        }

        Ok(response)
    }

    pub async fn set_schedule(
        &self,
        connector_name: &str,
        load: u32,
        retry_delay_millis: u64,
        time_intervals: &str,
    ) -> Result<(), ManagerError> {
        let schedule = Schedule::new(connector_name, load, retry_delay_millis, time_intervals)?;
        self.registry
            .set_connector_schedule(connector_name, &schedule)
            .await?;
        self.scheduler.refresh().await?;

        info!("Schedule for connector {} set to {}", connector_name, schedule);
        Ok(())
    }

    /// The scheduler is only told once the registry removal succeeded, so a
    /// still-registered connector is never left without scheduled work.
    pub async fn remove_connector(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.registry
            .remove_connector(connector_name)
            .await
            .map_err(into_instantiator_failure)?;
        self.scheduler.remove_connector(connector_name).await;

        info!("Connector {} removed", connector_name);
        Ok(())
    }

    /// The scheduler drops the connector first so no traversal resumes
    /// against state that is being reset, then picks it up again from the
    /// persisted schedule.
    pub async fn restart_connector_traversal(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.scheduler.remove_connector(connector_name).await;
        self.registry
            .restart_connector_traversal(connector_name)
            .await?;
        self.scheduler.refresh().await?;

        info!("Traversal for connector {} restarted", connector_name);
        Ok(())
    }

    pub async fn get_connector_config(
        &self,
        connector_name: &str,
    ) -> Result<ConnectorConfig, ManagerError> {
        self.registry.connector_config(connector_name).await
    }

    /// Persists the feeder gate location. Every failure surfaces as
    /// `PersistentStoreFailure`.
    pub async fn set_connector_manager_config(
        &self,
        feeder_gate_host: &str,
        feeder_gate_port: u16,
    ) -> Result<(), ManagerError> {
        let gate = FeederGate::new(feeder_gate_host, feeder_gate_port)?;
        self.settings
            .save_feeder_gate(&gate)
            .await
            .map_err(|e| match e {
                ManagerError::PersistentStoreFailure(_) => e,
                other => ManagerError::store(other.to_string()),
            })?;

        info!("Feeder gate set to {}", gate.address());
        Ok(())
    }

    pub async fn get_connector_manager_config(&self) -> Result<Option<FeederGate>, ManagerError> {
        self.settings.feeder_gate().await
    }
}

fn into_instantiator_failure(e: ManagerError) -> ManagerError {
    match e {
        ManagerError::InstantiatorFailure(_) => e,
        other => ManagerError::instantiator(other.to_string()),
    }
}

fn log_access_failure(connector_name: &str, e: &ManagerError) {
    match e {
        ManagerError::ConnectorNotFound(_) => {
            warn!("Connector {} not found: {}", connector_name, e)
        }
        ManagerError::InstantiatorFailure(_) => warn!("Instantiator: {}", e),
        ManagerError::RepositoryLoginFailure(_) => warn!("Login: {}", e),
        ManagerError::RepositoryFailure(_) => warn!("Repository: {}", e),
        _ => warn!("Connector {}: {}", connector_name, e),
    }
}
