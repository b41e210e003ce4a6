use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{ConnectorConfigStore, ScheduleStore, SettingsRepository, StateStore};
use crate::domain::{ConnectorConfig, ConnectorDefinition, FeederGate, ManagerError};

const FEEDER_GATE_HOST: &str = "feeder_gate.host";
const FEEDER_GATE_PORT: &str = "feeder_gate.port";

/// DuckDB-backed schedules, traversal state, connector definitions and
/// settings, one table each over a shared connection.
pub struct DuckdbConnectorStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbConnectorStore {
    pub fn new(db_path: &Path) -> Result<Self, ManagerError> {
        let conn = Connection::open(db_path)
            .map_err(|e| ManagerError::store(format!("Failed to open DuckDB database: {}", e)))?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, ManagerError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            ManagerError::store(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ManagerError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS connector_schedules (
                connector_name TEXT PRIMARY KEY,
                schedule TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS connector_states (
                connector_name TEXT PRIMARY KEY,
                state TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS connector_instances (
                connector_name TEXT PRIMARY KEY,
                type_name TEXT NOT NULL,
                config TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS manager_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ManagerError::store(format!("Failed to initialize schema: {}", e)))?;

        debug!("DuckDB connector store schema initialized");
        Ok(())
    }

    fn serialize_config(config: &ConnectorConfig) -> Result<String, ManagerError> {
        serde_json::to_string(config)
            .map_err(|e| ManagerError::store(format!("Failed to serialize config: {}", e)))
    }

    fn deserialize_config(name: &str, json: &str) -> Result<ConnectorConfig, ManagerError> {
        serde_json::from_str(json).map_err(|e| {
            ManagerError::store(format!("Corrupt config for connector {}: {}", name, e))
        })
    }

    async fn get_value(&self, sql: &str, key: &str) -> Result<Option<String>, ManagerError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| ManagerError::store(format!("Failed to prepare statement: {}", e)))?;

        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(value) => Ok(Some(value)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ManagerError::store(format!(
                "Failed to query {}: {}",
                key, e
            ))),
        }
    }

    async fn put_value(&self, sql: &str, key: &str, value: &str) -> Result<(), ManagerError> {
        let conn = self.conn.lock().await;
        conn.execute(sql, params![key, value])
            .map_err(|e| ManagerError::store(format!("Failed to store {}: {}", key, e)))?;
        Ok(())
    }

    async fn delete_value(&self, sql: &str, key: &str) -> Result<(), ManagerError> {
        let conn = self.conn.lock().await;
        conn.execute(sql, params![key])
            .map_err(|e| ManagerError::store(format!("Failed to delete {}: {}", key, e)))?;
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for DuckdbConnectorStore {
    async fn get_schedule(&self, connector_name: &str) -> Result<Option<String>, ManagerError> {
        self.get_value(
            "SELECT schedule FROM connector_schedules WHERE connector_name = ?1",
            connector_name,
        )
        .await
    }

    async fn store_schedule(&self, connector_name: &str, schedule: &str) -> Result<(), ManagerError> {
        self.put_value(
            r#"
            INSERT INTO connector_schedules (connector_name, schedule)
            VALUES (?1, ?2)
            ON CONFLICT (connector_name) DO UPDATE SET schedule = excluded.schedule
            "#,
            connector_name,
            schedule,
        )
        .await?;

        debug!("Stored schedule for {}", connector_name);
        Ok(())
    }

    async fn remove_schedule(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.delete_value(
            "DELETE FROM connector_schedules WHERE connector_name = ?1",
            connector_name,
        )
        .await
    }

    async fn list_schedules(&self) -> Result<Vec<(String, String)>, ManagerError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT connector_name, schedule FROM connector_schedules ORDER BY connector_name")
            .map_err(|e| ManagerError::store(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| ManagerError::store(format!("Failed to query schedules: {}", e)))?;

        let mut schedules = Vec::new();
        for row in rows {
            schedules
                .push(row.map_err(|e| ManagerError::store(format!("Failed to read row: {}", e)))?);
        }

        Ok(schedules)
    }
}

#[async_trait]
impl StateStore for DuckdbConnectorStore {
    async fn get_state(&self, connector_name: &str) -> Result<Option<String>, ManagerError> {
        self.get_value(
            "SELECT state FROM connector_states WHERE connector_name = ?1",
            connector_name,
        )
        .await
    }

    async fn store_state(&self, connector_name: &str, state: &str) -> Result<(), ManagerError> {
        self.put_value(
            r#"
            INSERT INTO connector_states (connector_name, state)
            VALUES (?1, ?2)
            ON CONFLICT (connector_name) DO UPDATE SET state = excluded.state
            "#,
            connector_name,
            state,
        )
        .await
    }

    async fn remove_state(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.delete_value(
            "DELETE FROM connector_states WHERE connector_name = ?1",
            connector_name,
        )
        .await?;

        debug!("Cleared traversal state for {}", connector_name);
        Ok(())
    }
}

#[async_trait]
impl ConnectorConfigStore for DuckdbConnectorStore {
    async fn get_definition(
        &self,
        connector_name: &str,
    ) -> Result<Option<ConnectorDefinition>, ManagerError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT type_name, config FROM connector_instances WHERE connector_name = ?1",
            )
            .map_err(|e| ManagerError::store(format!("Failed to prepare statement: {}", e)))?;

        let row = match stmt.query_row(params![connector_name], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        }) {
            Ok(row) => row,
            Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => {
                return Err(ManagerError::store(format!(
                    "Failed to query connector {}: {}",
                    connector_name, e
                )))
            }
        };

        let (type_name, config_json) = row;
        let config = Self::deserialize_config(connector_name, &config_json)?;
        Ok(Some(ConnectorDefinition::new(connector_name, type_name, config)))
    }

    async fn store_definition(&self, definition: &ConnectorDefinition) -> Result<(), ManagerError> {
        let config_json = Self::serialize_config(definition.config())?;
        let conn = self.conn.lock().await;

        conn.execute(
            r#"
            INSERT INTO connector_instances (connector_name, type_name, config)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (connector_name) DO UPDATE SET
                type_name = excluded.type_name,
                config = excluded.config
            "#,
            params![definition.name(), definition.type_name(), config_json],
        )
        .map_err(|e| ManagerError::store(format!("Failed to save connector: {}", e)))?;

        Ok(())
    }

    async fn remove_definition(&self, connector_name: &str) -> Result<(), ManagerError> {
        self.delete_value(
            "DELETE FROM connector_instances WHERE connector_name = ?1",
            connector_name,
        )
        .await
    }

    async fn list_definitions(&self) -> Result<Vec<ConnectorDefinition>, ManagerError> {
        let rows: Vec<(String, String, String)> = {
            let conn = self.conn.lock().await;
            let mut stmt = conn
                .prepare(
                    "SELECT connector_name, type_name, config FROM connector_instances ORDER BY connector_name",
                )
                .map_err(|e| ManagerError::store(format!("Failed to prepare statement: {}", e)))?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })
                .map_err(|e| ManagerError::store(format!("Failed to query connectors: {}", e)))?;

            let mut collected = Vec::new();
            for row in rows {
                collected.push(
                    row.map_err(|e| ManagerError::store(format!("Failed to read row: {}", e)))?,
                );
            }
            collected
        };

        rows.into_iter()
            .map(|(name, type_name, config_json)| {
                let config = Self::deserialize_config(&name, &config_json)?;
                Ok(ConnectorDefinition::new(name, type_name, config))
            })
            .collect()
    }
}

#[async_trait]
impl SettingsRepository for DuckdbConnectorStore {
    async fn feeder_gate(&self) -> Result<Option<FeederGate>, ManagerError> {
        let select = "SELECT value FROM manager_settings WHERE key = ?1";
        let host = self.get_value(select, FEEDER_GATE_HOST).await?;
        let port = self.get_value(select, FEEDER_GATE_PORT).await?;

        match (host, port) {
            (Some(host), Some(port)) => {
                let port = port.parse::<u16>().map_err(|e| {
                    ManagerError::store(format!("Corrupt feeder gate port '{}': {}", port, e))
                })?;
                FeederGate::new(host, port).map(Some)
            }
            _ => Ok(None),
        }
    }

    async fn save_feeder_gate(&self, gate: &FeederGate) -> Result<(), ManagerError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| ManagerError::store(format!("Failed to begin transaction: {}", e)))?;

        {
            let mut stmt = tx
                .prepare(
                    r#"
                    INSERT INTO manager_settings (key, value) VALUES (?1, ?2)
                    ON CONFLICT (key) DO UPDATE SET value = excluded.value
                    "#,
                )
                .map_err(|e| ManagerError::store(format!("Failed to prepare statement: {}", e)))?;

            let port = gate.port().to_string();
            for (key, value) in [(FEEDER_GATE_HOST, gate.host()), (FEEDER_GATE_PORT, port.as_str())] {
                stmt.execute(params![key, value])
                    .map_err(|e| ManagerError::store(format!("Failed to save {}: {}", key, e)))?;
            }
        }

        tx.commit()
            .map_err(|e| ManagerError::store(format!("Failed to commit: {}", e)))?;

        debug!("Saved feeder gate {}", gate.address());
        Ok(())
    }
}
