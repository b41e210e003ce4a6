use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    AuthenticationIdentity, AuthenticationResponse, AuthorizationResponse, ConfigureResponse,
    ConnectorConfig, Locale, ManagerError,
};

/// Verifies credentials against the content source.
#[async_trait]
pub trait AuthenticationManager: Send + Sync {
    /// Fails with `RepositoryLoginFailure` or `RepositoryFailure`.
    async fn authenticate(
        &self,
        identity: &AuthenticationIdentity,
    ) -> Result<AuthenticationResponse, ManagerError>;
}

/// Decides which documents an identity may see.
#[async_trait]
pub trait AuthorizationManager: Send + Sync {
    /// Responses for unknown docids may be omitted or negative.
    async fn authorize_docids(
        &self,
        docids: &[String],
        identity: &AuthenticationIdentity,
    ) -> Result<Vec<AuthorizationResponse>, ManagerError>;
}

/// A live connector instance. Both capabilities are optional.
pub trait Connector: Send + Sync {
    fn authentication_manager(&self) -> Option<Arc<dyn AuthenticationManager>> {
        None
    }

    fn authorization_manager(&self) -> Option<Arc<dyn AuthorizationManager>> {
        None
    }
}

/// A class of connector: owns the configuration schema and creates instances.
#[async_trait]
pub trait ConnectorType: Send + Sync {
    fn name(&self) -> &str;

    async fn config_form(&self, locale: &Locale) -> Result<ConfigureResponse, ManagerError>;

    async fn populated_config_form(
        &self,
        config: &ConnectorConfig,
        locale: &Locale,
    ) -> Result<ConfigureResponse, ManagerError>;

    /// `None` when the configuration is accepted; otherwise a form annotated
    /// with the errors.
    async fn validate_config(
        &self,
        config: &ConnectorConfig,
        locale: &Locale,
    ) -> Result<Option<ConfigureResponse>, ManagerError>;

    /// Fails with `InstantiatorFailure` when the connector cannot be built.
    async fn instantiate(
        &self,
        name: &str,
        config: &ConnectorConfig,
    ) -> Result<Arc<dyn Connector>, ManagerError>;
}
