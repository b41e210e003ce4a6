use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Schedule;

/// Configuration of a connector instance. Always replaced as a whole.
pub type ConnectorConfig = BTreeMap<String, String>;

/// Status code reported for every connector until statuses carry meaning.
pub const CONNECTOR_STATUS_OK: i32 = 0;

/// Persisted identity and configuration of a connector instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorDefinition {
    name: String,
    type_name: String,
    config: ConnectorConfig,
}

impl ConnectorDefinition {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        config: ConnectorConfig,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }
}

/// Snapshot of a registered connector, recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorStatus {
    name: String,
    type_name: String,
    status: i32,
    schedule: Option<Schedule>,
}

impl ConnectorStatus {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        schedule: Option<Schedule>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            status: CONNECTOR_STATUS_OK,
            schedule,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn status(&self) -> i32 {
        self.status
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    /// Canonical schedule string, or an empty string when unscheduled.
    pub fn schedule_string(&self) -> String {
        self.schedule
            .as_ref()
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_always_reports_fixed_code() {
        let schedule = Schedule::new("c1", 10, 0, "0-24").unwrap();
        let status = ConnectorStatus::new("c1", "filesystem", Some(schedule));

        assert_eq!(status.status(), CONNECTOR_STATUS_OK);
        assert_eq!(status.schedule_string(), "c1:10:0:0-24");
    }

    #[test]
    fn test_unscheduled_status() {
        let status = ConnectorStatus::new("c1", "filesystem", None);
        assert!(status.schedule().is_none());
        assert_eq!(status.schedule_string(), "");
    }
}
