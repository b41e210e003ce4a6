use anyhow::Result;

use crate::domain::{ConfigureResponse, ConnectorConfig, ConnectorStatus};

use super::super::Container;
use super::parse_assignments;

pub struct ConnectorController<'a> {
    container: &'a Container,
}

impl<'a> ConnectorController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn types(&self) -> Result<String> {
        let names = self.container.orchestrator().list_connector_type_names().await?;

        if names.is_empty() {
            return Ok("No connector types available.".to_string());
        }

        let mut output = "Connector types:\n\n".to_string();
        for name in names {
            output.push_str(&format!("  {}\n", name));
        }
        Ok(output)
    }

    pub async fn list(&self, json: bool) -> Result<String> {
        let statuses = self.container.orchestrator().list_connector_statuses().await?;

        if json {
            return Ok(serde_json::to_string_pretty(&statuses)?);
        }
        Ok(self.format_status_list(&statuses))
    }

    pub async fn status(&self, name: String) -> Result<String> {
        let status = self.container.orchestrator().get_connector_status(&name).await?;
        Ok(self.format_status(&status))
    }

    pub async fn add(
        &self,
        name: String,
        type_name: String,
        assignments: Vec<String>,
        language: String,
    ) -> Result<String> {
        let config: ConnectorConfig = parse_assignments(&assignments)?.into_iter().collect();
        let response = self
            .container
            .orchestrator()
            .set_connector_config(&name, &type_name, config, &language, false)
            .await?;

        Ok(match response {
            Some(form) => self.format_rejection(&form),
            None => format!("Connector {} ({}) created.", name, type_name),
        })
    }

    /// Replaces the configuration wholesale; keys not given are dropped.
    pub async fn update(
        &self,
        name: String,
        assignments: Vec<String>,
        language: String,
    ) -> Result<String> {
        let config: ConnectorConfig = parse_assignments(&assignments)?.into_iter().collect();
        let orchestrator = self.container.orchestrator();
        let type_name = orchestrator.get_connector_status(&name).await?.type_name().to_string();

        let response = orchestrator
            .set_connector_config(&name, &type_name, config, &language, true)
            .await?;

        Ok(match response {
            Some(form) => self.format_rejection(&form),
            None => format!("Connector {} updated.", name),
        })
    }

    pub async fn config(&self, name: String) -> Result<String> {
        let config = self.container.orchestrator().get_connector_config(&name).await?;

        if config.is_empty() {
            return Ok(format!("Connector {} has no configuration.", name));
        }

        let mut output = String::new();
        for (key, value) in &config {
            output.push_str(&format!("{}={}\n", key, value));
        }
        Ok(output)
    }

    pub async fn form(
        &self,
        type_name: Option<String>,
        connector: Option<String>,
        language: String,
    ) -> Result<String> {
        let orchestrator = self.container.orchestrator();
        let form = match (connector, type_name) {
            (Some(connector), _) => {
                orchestrator
                    .get_config_form_for_connector(&connector, &language)
                    .await?
            }
            (None, Some(type_name)) => orchestrator.get_config_form(&type_name, &language).await?,
            (None, None) => anyhow::bail!("either a connector type or --connector is required"),
        };

        Ok(form.form_snippet().unwrap_or_default().to_string())
    }

    pub async fn remove(&self, name: String) -> Result<String> {
        self.container.orchestrator().remove_connector(&name).await?;
        Ok(format!("Connector {} removed.", name))
    }

    pub async fn restart(&self, name: String) -> Result<String> {
        self.container
            .orchestrator()
            .restart_connector_traversal(&name)
            .await?;
        Ok(format!("Traversal of connector {} will start over.", name))
    }

    fn format_status_list(&self, statuses: &[ConnectorStatus]) -> String {
        if statuses.is_empty() {
            return "No connectors registered.".to_string();
        }

        let mut output = "Connectors:\n\n".to_string();
        for status in statuses {
            output.push_str(&self.format_status(status));
            output.push('\n');
        }
        output
    }

    fn format_status(&self, status: &ConnectorStatus) -> String {
        let schedule = match status.schedule() {
            Some(schedule) => schedule.to_string(),
            None => "(not scheduled)".to_string(),
        };

        format!(
            "  {} ({})\n    Status:   {}\n    Schedule: {}\n",
            status.name(),
            status.type_name(),
            status.status(),
            schedule
        )
    }

    fn format_rejection(&self, form: &ConfigureResponse) -> String {
        let mut output = format!(
            "Configuration rejected: {}\n",
            form.message().unwrap_or("invalid configuration")
        );
        if let Some(snippet) = form.form_snippet() {
            output.push('\n');
            output.push_str(snippet);
        }
        output
    }
}
