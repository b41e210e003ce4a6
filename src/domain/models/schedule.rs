use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ManagerError;

/// Retry delay applied to schedules persisted before the delay field existed.
pub const DEFAULT_RETRY_DELAY_MILLIS: u64 = 300_000;

const FIELD_SEPARATOR: char = ':';

/// Traversal schedule for a single connector.
///
/// The persisted form is `name:load:retryDelayMillis:timeIntervals`. Time
/// intervals are opaque here and may themselves contain separators, so
/// everything after the third separator belongs to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Schedule {
    connector_name: String,
    load: u32,
    retry_delay_millis: u64,
    time_intervals: String,
}

impl Schedule {
    pub fn new(
        connector_name: impl Into<String>,
        load: u32,
        retry_delay_millis: u64,
        time_intervals: impl Into<String>,
    ) -> Result<Self, ManagerError> {
        let connector_name = connector_name.into();
        if connector_name.is_empty() {
            return Err(ManagerError::invalid_schedule("connector name is empty"));
        }
        if connector_name.contains(FIELD_SEPARATOR) {
            return Err(ManagerError::invalid_schedule(format!(
                "connector name '{}' contains '{}'",
                connector_name, FIELD_SEPARATOR
            )));
        }
        if load == 0 {
            return Err(ManagerError::invalid_schedule(format!(
                "load for connector '{}' must be positive",
                connector_name
            )));
        }

        Ok(Self {
            connector_name,
            load,
            retry_delay_millis,
            time_intervals: time_intervals.into(),
        })
    }

    pub fn connector_name(&self) -> &str {
        &self.connector_name
    }

    pub fn load(&self) -> u32 {
        self.load
    }

    pub fn retry_delay_millis(&self) -> u64 {
        self.retry_delay_millis
    }

    pub fn time_intervals(&self) -> &str {
        &self.time_intervals
    }

    pub fn is_for(&self, connector_name: &str) -> bool {
        self.connector_name == connector_name
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}",
            self.connector_name,
            self.load,
            self.retry_delay_millis,
            self.time_intervals,
            sep = FIELD_SEPARATOR
        )
    }
}

impl FromStr for Schedule {
    type Err = ManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.splitn(3, FIELD_SEPARATOR);

        let name = fields.next().unwrap_or_default();
        let load = fields
            .next()
            .ok_or_else(|| ManagerError::invalid_schedule(format!("missing load in '{}'", s)))?;
        let rest = fields.next().ok_or_else(|| {
            ManagerError::invalid_schedule(format!("missing time intervals in '{}'", s))
        })?;

        let load: u32 = load
            .trim()
            .parse()
            .map_err(|e| ManagerError::invalid_schedule(format!("bad load '{}': {}", load, e)))?;

        // Legacy three-field schedules go straight from load to intervals.
        let (retry_delay_millis, time_intervals) = match rest.split_once(FIELD_SEPARATOR) {
            Some((delay, intervals)) if is_retry_delay(delay) => {
                let delay = delay.trim().parse().map_err(|e| {
                    ManagerError::invalid_schedule(format!("bad retry delay '{}': {}", delay, e))
                })?;
                (delay, intervals)
            }
            _ if is_retry_delay(rest) => {
                let delay = rest.trim().parse().map_err(|e| {
                    ManagerError::invalid_schedule(format!("bad retry delay '{}': {}", rest, e))
                })?;
                (delay, "")
            }
            _ => (DEFAULT_RETRY_DELAY_MILLIS, rest),
        };

        Schedule::new(name, load, retry_delay_millis, time_intervals)
    }
}

fn is_retry_delay(field: &str) -> bool {
    let field = field.trim();
    !field.is_empty() && field.chars().all(|c| c.is_ascii_digit())
}

impl TryFrom<String> for Schedule {
    type Error = ManagerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Schedule> for String {
    fn from(schedule: Schedule) -> Self {
        schedule.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_round_trip() {
        let cases = [
            ("connector1", 60, 0, "1-2:3-8"),
            ("c", 1, 300_000, ""),
            ("weird-name_2", 5000, 12, "0-24"),
        ];

        for (name, load, delay, intervals) in cases {
            let schedule = Schedule::new(name, load, delay, intervals).unwrap();
            let parsed: Schedule = schedule.to_string().parse().unwrap();

            assert_eq!(parsed, schedule);
            assert_eq!(parsed.connector_name(), name);
            assert_eq!(parsed.load(), load);
            assert_eq!(parsed.retry_delay_millis(), delay);
            assert_eq!(parsed.time_intervals(), intervals);
        }
    }

    #[test]
    fn test_canonical_format() {
        let schedule = Schedule::new("connector1", 60, 1000, "1-2:3-8").unwrap();
        assert_eq!(schedule.to_string(), "connector1:60:1000:1-2:3-8");
    }

    #[test]
    fn test_legacy_schedule_uses_default_retry_delay() {
        let schedule: Schedule = "connector1:60:1-2:3-8".parse().unwrap();

        assert_eq!(schedule.load(), 60);
        assert_eq!(schedule.retry_delay_millis(), DEFAULT_RETRY_DELAY_MILLIS);
        assert_eq!(schedule.time_intervals(), "1-2:3-8");
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!("connector1".parse::<Schedule>().is_err());
        assert!("connector1:abc:0:1-2".parse::<Schedule>().is_err());
        assert!("connector1:0:0:1-2".parse::<Schedule>().is_err());
        assert!(":60:0:1-2".parse::<Schedule>().is_err());
        assert!(Schedule::new("a:b", 1, 0, "").is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let schedule = Schedule::new("connector1", 60, 0, "0-24").unwrap();
        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, "\"connector1:60:0:0-24\"");

        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }
}
