use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::{AuthenticationManager, AuthorizationManager, Connector, ConnectorType};
use crate::domain::{ConfigureResponse, ConnectorConfig, Locale, ManagerError};

/// Connector type described entirely by its configuration keys.
///
/// Forms are rendered as HTML table rows, one text input per key. Validation
/// only checks that every required key has a non-blank value. Authentication
/// and authorization capabilities, when attached, are shared by every
/// instance of the type.
pub struct SimpleConnectorType {
    name: String,
    required_keys: Vec<String>,
    optional_keys: Vec<String>,
    authentication: Option<Arc<dyn AuthenticationManager>>,
    authorization: Option<Arc<dyn AuthorizationManager>>,
}

impl SimpleConnectorType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_keys: Vec::new(),
            optional_keys: Vec::new(),
            authentication: None,
            authorization: None,
        }
    }

    pub fn with_required_key(mut self, key: impl Into<String>) -> Self {
        self.required_keys.push(key.into());
        self
    }

    pub fn with_optional_key(mut self, key: impl Into<String>) -> Self {
        self.optional_keys.push(key.into());
        self
    }

    pub fn with_authentication(mut self, manager: Arc<dyn AuthenticationManager>) -> Self {
        self.authentication = Some(manager);
        self
    }

    pub fn with_authorization(mut self, manager: Arc<dyn AuthorizationManager>) -> Self {
        self.authorization = Some(manager);
        self
    }

    pub fn required_keys(&self) -> &[String] {
        &self.required_keys
    }

    fn render_form(&self, config: Option<&ConnectorConfig>) -> String {
        let mut form = String::new();
        for key in self.required_keys.iter().chain(&self.optional_keys) {
            let value = config
                .and_then(|c| c.get(key))
                .map(String::as_str)
                .unwrap_or_default();
            let marker = if self.required_keys.contains(key) { " *" } else { "" };
            form.push_str(&format!(
                "<tr><td>{}{}</td><td><input type=\"text\" name=\"{}\" value=\"{}\"/></td></tr>\n",
                escape_html(key),
                marker,
                escape_html(key),
                escape_html(value)
            ));
        }
        form
    }

    fn missing_keys(&self, config: &ConnectorConfig) -> Vec<&str> {
        self.required_keys
            .iter()
            .filter(|key| config.get(*key).map_or(true, |v| v.trim().is_empty()))
            .map(String::as_str)
            .collect()
    }
}

#[async_trait]
impl ConnectorType for SimpleConnectorType {
    fn name(&self) -> &str {
        &self.name
    }

    async fn config_form(&self, _locale: &Locale) -> Result<ConfigureResponse, ManagerError> {
        Ok(ConfigureResponse::form(self.render_form(None)))
    }

    async fn populated_config_form(
        &self,
        config: &ConnectorConfig,
        _locale: &Locale,
    ) -> Result<ConfigureResponse, ManagerError> {
        Ok(ConfigureResponse::form(self.render_form(Some(config))))
    }

    async fn validate_config(
        &self,
        config: &ConnectorConfig,
        locale: &Locale,
    ) -> Result<Option<ConfigureResponse>, ManagerError> {
        let missing = self.missing_keys(config);
        if missing.is_empty() {
            return Ok(None);
        }

        debug!(
            "Rejecting {} configuration ({}): missing {:?}",
            self.name, locale, missing
        );
        let form = ConfigureResponse::form(self.render_form(Some(config)))
            .with_message(format!("Missing required configuration: {}", missing.join(", ")))
            .with_config_data(config.clone());
        Ok(Some(form))
    }

    async fn instantiate(
        &self,
        name: &str,
        config: &ConnectorConfig,
    ) -> Result<Arc<dyn Connector>, ManagerError> {
        if let Some(key) = self.missing_keys(config).first() {
            return Err(ManagerError::instantiator(format!(
                "cannot create {} connector {}: {} is not set",
                self.name, name, key
            )));
        }

        Ok(Arc::new(SimpleConnector {
            authentication: self.authentication.clone(),
            authorization: self.authorization.clone(),
        }))
    }
}

/// Instance created by [`SimpleConnectorType`].
pub struct SimpleConnector {
    authentication: Option<Arc<dyn AuthenticationManager>>,
    authorization: Option<Arc<dyn AuthorizationManager>>,
}

impl Connector for SimpleConnector {
    fn authentication_manager(&self) -> Option<Arc<dyn AuthenticationManager>> {
        self.authentication.clone()
    }

    fn authorization_manager(&self) -> Option<Arc<dyn AuthorizationManager>> {
        self.authorization.clone()
    }
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
