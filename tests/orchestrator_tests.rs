use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use connector_manager::application::{
    AuthenticationManager, AuthorizationManager, ConnectorType, ScheduleStore, StateStore,
};
use connector_manager::domain::{
    AuthenticationIdentity, AuthenticationResponse, AuthorizationResponse,
};
use connector_manager::{
    ConnectorConfig, ConnectorOrchestrator, InMemoryConnectorRegistry, InMemoryConnectorStore,
    InMemoryTraversalScheduler, ManagerError, SimpleConnectorType, TraversalScheduler,
};

struct PasswordCheck;

#[async_trait]
impl AuthenticationManager for PasswordCheck {
    async fn authenticate(
        &self,
        identity: &AuthenticationIdentity,
    ) -> Result<AuthenticationResponse, ManagerError> {
        match identity.password() {
            Some("secret") => Ok(AuthenticationResponse::new(true, None)),
            Some(_) => Ok(AuthenticationResponse::invalid()),
            None => Err(ManagerError::login("password required")),
        }
    }
}

/// Lets `alice` see even-numbered documents; fails for `mallory`.
struct EvenDocuments;

#[async_trait]
impl AuthorizationManager for EvenDocuments {
    async fn authorize_docids(
        &self,
        docids: &[String],
        identity: &AuthenticationIdentity,
    ) -> Result<Vec<AuthorizationResponse>, ManagerError> {
        if identity.username() == "mallory" {
            return Err(ManagerError::repository("directory unavailable"));
        }
        Ok(docids
            .iter()
            .filter_map(|id| id.parse::<u32>().ok().map(|n| (id, n)))
            .map(|(id, n)| AuthorizationResponse::new(id.as_str(), identity.username() == "alice" && n % 2 == 0))
            .collect())
    }
}

struct Harness {
    orchestrator: ConnectorOrchestrator,
    scheduler: Arc<InMemoryTraversalScheduler>,
    registry: Arc<InMemoryConnectorRegistry>,
    store: Arc<InMemoryConnectorStore>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryConnectorStore::new());
    let registry = Arc::new(
        InMemoryConnectorRegistry::new(store.clone(), store.clone(), store.clone())
            .with_type(Arc::new(
                SimpleConnectorType::new("secure")
                    .with_required_key("root")
                    .with_authentication(Arc::new(PasswordCheck))
                    .with_authorization(Arc::new(EvenDocuments)),
            ))
            .with_type(Arc::new(SimpleConnectorType::new("open"))),
    );
    let scheduler = Arc::new(InMemoryTraversalScheduler::new(store.clone()));
    let orchestrator =
        ConnectorOrchestrator::new(registry.clone(), scheduler.clone(), store.clone());

    Harness {
        orchestrator,
        scheduler,
        registry,
        store,
    }
}

fn config(root: &str) -> ConnectorConfig {
    let mut config = ConnectorConfig::new();
    config.insert("root".to_string(), root.to_string());
    config
}

async fn create(h: &Harness, name: &str, type_name: &str) {
    let response = h
        .orchestrator
        .set_connector_config(name, type_name, config("/data"), "en", false)
        .await
        .expect("create connector");
    assert!(response.is_none());
}

#[tokio::test]
async fn lifecycle_create_schedule_list_remove() {
    let h = harness();
    create(&h, "b-docs", "secure").await;
    create(&h, "a-wiki", "open").await;

    h.orchestrator
        .set_schedule("b-docs", 8, 60_000, "0-6:22-24")
        .await
        .expect("schedule");
    assert_eq!(h.scheduler.scheduled_connectors().await.len(), 1);

    let statuses = h.orchestrator.list_connector_statuses().await.expect("list");
    let names: Vec<_> = statuses.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["a-wiki", "b-docs"]);
    assert_eq!(statuses[1].schedule_string(), "b-docs:8:60000:0-6:22-24");
    assert!(statuses[0].schedule().is_none());

    h.orchestrator.remove_connector("b-docs").await.expect("remove");

    assert!(h.scheduler.scheduled_connectors().await.is_empty());
    assert_eq!(h.store.get_schedule("b-docs").await.expect("get"), None);
    let err = h.orchestrator.get_connector_status("b-docs").await.unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn remove_unknown_connector_is_quiet() {
    let h = harness();
    h.orchestrator.remove_connector("ghost").await.expect("no-op");
}

#[tokio::test]
async fn restart_resets_checkpoint_and_reschedules() {
    let h = harness();
    create(&h, "docs", "secure").await;
    h.orchestrator
        .set_schedule("docs", 2, 0, "0-24")
        .await
        .expect("schedule");
    h.registry
        .record_checkpoint("docs", "page=17")
        .await
        .expect("checkpoint");

    h.orchestrator
        .restart_connector_traversal("docs")
        .await
        .expect("restart");

    assert_eq!(h.store.get_state("docs").await.expect("state"), None);
    let scheduled = h.scheduler.scheduled_connectors().await;
    assert_eq!(scheduled.len(), 1);
    assert!(scheduled[0].is_for("docs"));
}

#[tokio::test]
async fn set_schedule_reaches_scheduler_without_refresh() {
    let h = harness();
    create(&h, "docs", "secure").await;

    h.orchestrator
        .set_schedule("docs", 2, 0, "0-24")
        .await
        .expect("schedule");

    let scheduled = h.scheduler.scheduled_connectors().await;
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].to_string(), "docs:2:0:0-24");
}

#[tokio::test]
async fn get_connector_type_known_and_unknown() {
    let h = harness();

    let connector_type = h.orchestrator.get_connector_type("secure").await.expect("type");
    assert_eq!(connector_type.name(), "secure");

    let err = match h.orchestrator.get_connector_type("sharepoint").await {
        Ok(_) => panic!("unknown type should not resolve"),
        Err(e) => e,
    };
    assert!(err.is_connector_type_not_found());
}

#[tokio::test]
async fn authentication_is_fail_closed() {
    let h = harness();
    create(&h, "docs", "secure").await;
    create(&h, "wiki", "open").await;

    let good = AuthenticationIdentity::new("alice").with_password("secret");
    let bad = AuthenticationIdentity::new("alice").with_password("guess");
    let anonymous = AuthenticationIdentity::new("alice");

    assert!(h.orchestrator.authenticate("docs", &good).await);
    assert!(!h.orchestrator.authenticate("docs", &bad).await);
    assert!(!h.orchestrator.authenticate("docs", &anonymous).await);
    assert!(!h.orchestrator.authenticate("wiki", &good).await);
    assert!(!h.orchestrator.authenticate("ghost", &good).await);
}

#[tokio::test]
async fn authorization_filters_and_fails_closed() {
    let h = harness();
    create(&h, "docs", "secure").await;
    create(&h, "wiki", "open").await;

    let docids: Vec<String> = ["1", "2", "4", "x"].iter().map(|s| s.to_string()).collect();

    let allowed = h.orchestrator.authorize_documents("docs", &docids, "alice").await;
    let expected: HashSet<String> = ["2", "4"].iter().map(|s| s.to_string()).collect();
    assert_eq!(allowed, expected);

    assert!(h
        .orchestrator
        .authorize_documents("docs", &docids, "bob")
        .await
        .is_empty());
    assert!(h
        .orchestrator
        .authorize_documents("docs", &docids, "mallory")
        .await
        .is_empty());
    assert!(h
        .orchestrator
        .authorize_documents("wiki", &docids, "alice")
        .await
        .is_empty());
    assert!(h
        .orchestrator
        .authorize_documents("ghost", &docids, "alice")
        .await
        .is_empty());
}

#[tokio::test]
async fn config_forms_and_update() {
    let h = harness();
    create(&h, "docs", "secure").await;

    let blank = h.orchestrator.get_config_form("secure", "de_DE").await.expect("form");
    assert!(blank.form_snippet().expect("snippet").contains("name=\"root\""));

    let populated = h
        .orchestrator
        .get_config_form_for_connector("docs", "en")
        .await
        .expect("populated form");
    assert!(populated.form_snippet().expect("snippet").contains("value=\"/data\""));

    let rejected = h
        .orchestrator
        .set_connector_config("docs", "secure", ConnectorConfig::new(), "en", true)
        .await
        .expect("update");
    assert!(rejected.expect("validation form").has_errors());
    assert_eq!(
        h.orchestrator.get_connector_config("docs").await.expect("config"),
        config("/data")
    );

    h.orchestrator
        .set_connector_config("docs", "secure", config("/other"), "en", true)
        .await
        .expect("update");
    assert_eq!(
        h.orchestrator.get_connector_config("docs").await.expect("config"),
        config("/other")
    );

    let err = h
        .orchestrator
        .get_config_form("missing", "en")
        .await
        .unwrap_err();
    assert!(err.is_connector_type_not_found());
}

#[tokio::test]
async fn feeder_gate_settings() {
    let h = harness();

    h.orchestrator
        .set_connector_manager_config("gsa.example.com", 19900)
        .await
        .expect("set");
    let gate = h
        .orchestrator
        .get_connector_manager_config()
        .await
        .expect("get")
        .expect("configured");
    assert_eq!(gate.address(), "gsa.example.com:19900");

    let err = h
        .orchestrator
        .set_connector_manager_config("", 19900)
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn type_names_are_sorted() {
    let h = harness();
    let names: Vec<_> = h
        .orchestrator
        .list_connector_type_names()
        .await
        .expect("types")
        .into_iter()
        .collect();
    assert_eq!(names, vec!["open".to_string(), "secure".to_string()]);
}
