pub mod access_controller;
pub mod connector_controller;
pub mod feeder_gate_controller;
pub mod resolve_url_controller;
pub mod schedule_controller;

pub use access_controller::AccessController;
pub use connector_controller::ConnectorController;
pub use feeder_gate_controller::FeederGateController;
pub use resolve_url_controller::ResolveUrlController;
pub use schedule_controller::ScheduleController;

use anyhow::{bail, Result};

/// Splits repeated `KEY=VALUE` arguments into pairs. Values may contain `=`.
pub(crate) fn parse_assignments(entries: &[String]) -> Result<Vec<(String, String)>> {
    entries
        .iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => bail!("expected KEY=VALUE, got '{}'", entry),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments_keeps_equals_in_value() {
        let parsed = parse_assignments(&["query=a=b".to_string(), " root =/srv".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("query".to_string(), "a=b".to_string()),
                ("root".to_string(), "/srv".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_assignments_rejects_missing_key() {
        assert!(parse_assignments(&["=value".to_string()]).is_err());
        assert!(parse_assignments(&["novalue".to_string()]).is_err());
    }
}
