use connector_manager::connector::api::{Container, ContainerConfig, Router};
use connector_manager::Commands;
use tempfile::tempdir;

async fn memory_container(content_url_prefix: Option<&str>, feed_type: Option<&str>) -> Container {
    Container::new(ContainerConfig {
        data_dir: String::new(),
        memory_storage: true,
        content_url_prefix: content_url_prefix.map(str::to_string),
        feed_type: feed_type.map(str::to_string),
    })
    .await
    .expect("container")
}

fn add(name: &str, type_name: &str, set: &[&str]) -> Commands {
    Commands::Add {
        name: name.to_string(),
        type_name: type_name.to_string(),
        set: set.iter().map(|s| s.to_string()).collect(),
        language: "en".to_string(),
    }
}

#[tokio::test]
async fn router_lists_builtin_types() {
    let container = memory_container(None, None).await;
    let output = Router::new(&container).route(Commands::Types).await.expect("types");

    assert!(output.contains("database"));
    assert!(output.contains("filesystem"));
    assert!(output.contains("web"));
}

#[tokio::test]
async fn router_add_reports_validation_errors() {
    let container = memory_container(None, None).await;
    let router = Router::new(&container);

    let output = router.route(add("db1", "database", &["url=jdbc:h2:mem"])).await.expect("add");
    assert!(output.starts_with("Configuration rejected: Missing required configuration: query"));

    let output = router
        .route(Commands::List { json: false })
        .await
        .expect("list");
    assert_eq!(output, "No connectors registered.");
}

#[tokio::test]
async fn router_schedule_and_json_listing() {
    let container = memory_container(None, None).await;
    let router = Router::new(&container);

    router.route(add("fs", "filesystem", &["root=/srv"])).await.expect("add");
    let output = router
        .route(Commands::Schedule {
            name: "fs".to_string(),
            load: 3,
            retry_delay: 300_000,
            intervals: "1-5".to_string(),
        })
        .await
        .expect("schedule");
    assert_eq!(output, "Connector fs scheduled: fs:3:300000:1-5");

    let json = router
        .route(Commands::List { json: true })
        .await
        .expect("list");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(parsed[0]["name"], "fs");
    assert_eq!(parsed[0]["schedule"], "fs:3:300000:1-5");
}

#[tokio::test]
async fn router_resolves_content_urls() {
    let container = memory_container(
        Some("http://cm.example.com/getDocumentContent"),
        Some("contenturl"),
    )
    .await;
    let router = Router::new(&container);

    let output = router
        .route(Commands::ResolveUrl {
            connector: "fs".to_string(),
            prop: vec!["google:docid=a b".to_string()],
            acl: false,
            inherit_from: false,
        })
        .await
        .expect("resolve");

    assert_eq!(
        output,
        "http://cm.example.com/getDocumentContent?connector-name=fs&docid=a+b"
    );
}

#[tokio::test]
async fn router_resolves_inherited_acl_with_declared_feed_type() {
    let container = memory_container(None, Some("contenturl")).await;

    let output = Router::new(&container)
        .route(Commands::ResolveUrl {
            connector: "fs".to_string(),
            prop: vec![
                "google:aclinheritfrom:docid=folder-1".to_string(),
                "google:feedtype=contenturl".to_string(),
                "google:aclinheritfrom:feedtype=web".to_string(),
            ],
            acl: false,
            inherit_from: true,
        })
        .await
        .expect("resolve");

    assert_eq!(output, "folder-1");
}

#[tokio::test]
async fn router_status_of_unknown_connector_fails() {
    let container = memory_container(None, None).await;
    let result = Router::new(&container)
        .route(Commands::Status {
            name: "ghost".to_string(),
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn duckdb_container_persists_between_runs() {
    let dir = tempdir().expect("tempdir");
    let config = || ContainerConfig {
        data_dir: dir.path().to_string_lossy().to_string(),
        memory_storage: false,
        content_url_prefix: None,
        feed_type: Some("web".to_string()),
    };

    {
        let container = Container::new(config()).await.expect("container");
        Router::new(&container)
            .route(add("site", "web", &["start_url=http://intranet/"]))
            .await
            .expect("add");
    }

    let container = Container::new(config()).await.expect("container reopen");
    let output = Router::new(&container)
        .route(Commands::Config {
            name: "site".to_string(),
        })
        .await
        .expect("config");
    assert_eq!(output, "start_url=http://intranet/\n");
}
