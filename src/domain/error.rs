use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Connector not found: {0}")]
    ConnectorNotFound(String),

    #[error("Connector type not found: {0}")]
    ConnectorTypeNotFound(String),

    #[error("Instantiator failure: {0}")]
    InstantiatorFailure(String),

    #[error("Persistent store failure: {0}")]
    PersistentStoreFailure(String),

    #[error("Supplied {property} URL {url} is malformed: {reason}")]
    MalformedDocumentUrl {
        property: String,
        url: String,
        reason: String,
    },

    #[error("Document has neither property {docid_property} nor property {url_property}")]
    MissingAddressingProperty {
        url_property: String,
        docid_property: String,
    },

    #[error("Repository failure: {0}")]
    RepositoryFailure(String),

    #[error("Repository login failure: {0}")]
    RepositoryLoginFailure(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ManagerError {
    pub fn connector_not_found(name: impl Into<String>) -> Self {
        Self::ConnectorNotFound(name.into())
    }

    pub fn connector_type_not_found(type_name: impl Into<String>) -> Self {
        Self::ConnectorTypeNotFound(type_name.into())
    }

    pub fn instantiator(msg: impl Into<String>) -> Self {
        Self::InstantiatorFailure(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::PersistentStoreFailure(msg.into())
    }

    pub fn repository(msg: impl Into<String>) -> Self {
        Self::RepositoryFailure(msg.into())
    }

    pub fn login(msg: impl Into<String>) -> Self {
        Self::RepositoryLoginFailure(msg.into())
    }

    pub fn invalid_schedule(msg: impl Into<String>) -> Self {
        Self::InvalidSchedule(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed_url(
        property: impl Into<String>,
        url: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedDocumentUrl {
            property: property.into(),
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn is_connector_not_found(&self) -> bool {
        matches!(self, Self::ConnectorNotFound(_))
    }

    pub fn is_connector_type_not_found(&self) -> bool {
        matches!(self, Self::ConnectorTypeNotFound(_))
    }

    pub fn is_instantiator_failure(&self) -> bool {
        matches!(self, Self::InstantiatorFailure(_))
    }

    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::PersistentStoreFailure(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState(_))
    }
}
