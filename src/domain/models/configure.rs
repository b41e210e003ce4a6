use serde::{Deserialize, Serialize};

use super::ConnectorConfig;

/// Configuration form returned by a connector type.
///
/// When produced by validation, `message` carries the errors to show the
/// operator and `config_data` may hold corrected values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureResponse {
    message: Option<String>,
    form_snippet: Option<String>,
    config_data: Option<ConnectorConfig>,
}

impl ConfigureResponse {
    pub fn new(message: Option<String>, form_snippet: Option<String>) -> Self {
        Self {
            message,
            form_snippet,
            config_data: None,
        }
    }

    pub fn form(form_snippet: impl Into<String>) -> Self {
        Self::new(None, Some(form_snippet.into()))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_config_data(mut self, config_data: ConnectorConfig) -> Self {
        self.config_data = Some(config_data);
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn form_snippet(&self) -> Option<&str> {
        self.form_snippet.as_deref()
    }

    pub fn config_data(&self) -> Option<&ConnectorConfig> {
        self.config_data.as_ref()
    }

    pub fn has_errors(&self) -> bool {
        self.message.as_ref().is_some_and(|m| !m.is_empty())
    }
}
