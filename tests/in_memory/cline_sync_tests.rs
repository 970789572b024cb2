//! Mirroring connected services into external MCP settings.

use super::helpers::{
    ScratchDir, ScriptedRegistry, eventually, github_token, id, register_github, scripted,
};
use camino::Utf8PathBuf;
use devhub::service_registry::{
    adapters::{ClineSettingsFile, memory::InMemoryServerConfig},
    domain::{CredentialSet, LifecycleEvent, ServiceConfig, ServiceKind, ServiceStatus},
    ports::{ConnectorError, ExternalServerConfig, ExternalServerEntry},
    services::{ClineExport, ClineSync, RegisterServiceRequest},
};
use rstest::rstest;
use std::collections::BTreeMap;
use std::sync::Arc;

fn export() -> ClineExport {
    ClineExport::new("/opt/devhub/servers")
}

fn has_entry(settings: &InMemoryServerConfig, name: &str) -> bool {
    settings.entry(name).expect("entry lookup").is_some()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn observer_follows_connect_and_disconnect(scripted: ScriptedRegistry) {
    let ScriptedRegistry { registry, .. } = scripted;
    register_github(&registry).await;
    let settings = Arc::new(InMemoryServerConfig::new());
    let task = ClineSync::new(Arc::clone(&registry), Arc::clone(&settings), export()).spawn();

    registry.connect(&id("github"), github_token("ghp_abc")).await;
    assert!(eventually(|| async { has_entry(&settings, "devhub-github") }).await);
    let entry = settings
        .entry("devhub-github")
        .expect("entry lookup")
        .expect("entry exported");
    assert_eq!(entry.args, vec!["/opt/devhub/servers/github/index.js".to_owned()]);
    assert_eq!(entry.env.get("GITHUB_TOKEN").map(String::as_str), Some("ghp_abc"));

    registry.disconnect(&id("github")).await;
    assert!(eventually(|| async { !has_entry(&settings, "devhub-github") }).await);

    registry.shutdown().await;
    task.await.expect("observer stops once the bus closes");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_connects_are_not_exported(scripted: ScriptedRegistry) {
    let ScriptedRegistry {
        registry,
        connectors,
    } = scripted;
    register_github(&registry).await;
    let mut events = registry.subscribe();
    let settings = Arc::new(InMemoryServerConfig::new());
    let sync = ClineSync::new(Arc::clone(&registry), Arc::clone(&settings), export());
    connectors.set_failure(Some(ConnectorError::check_failed(
        ServiceKind::GitHub,
        "HTTP 401: Bad credentials",
    )));

    registry.connect(&id("github"), github_token("ghp_bad")).await;
    while let Ok(event) = events.try_recv() {
        sync.handle(&event).await.expect("event handled");
    }

    assert!(settings.entry_names().await.expect("names").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_disconnect_event_keeps_connected_entry(scripted: ScriptedRegistry) {
    let ScriptedRegistry { registry, .. } = scripted;
    register_github(&registry).await;
    registry.connect(&id("github"), github_token("ghp_abc")).await;
    let settings = Arc::new(InMemoryServerConfig::new());
    let sync = ClineSync::new(Arc::clone(&registry), Arc::clone(&settings), export());
    sync.sync_all_connected().await.expect("resync");
    let stale = LifecycleEvent::StatusChanged {
        service_id: id("github"),
        status: ServiceStatus::Disconnected,
    };

    sync.handle(&stale).await.expect("event handled");
    assert!(has_entry(&settings, "devhub-github"));

    registry.disconnect(&id("github")).await;
    sync.handle(&stale).await.expect("event handled");
    assert!(!has_entry(&settings, "devhub-github"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn config_updates_refresh_the_exported_entry(scripted: ScriptedRegistry) {
    let ScriptedRegistry { registry, .. } = scripted;
    registry
        .register_service(RegisterServiceRequest::new(
            "mongodb",
            "MongoDB",
            ServiceKind::MongoDb,
        ))
        .await
        .expect("registration should succeed");
    let settings = Arc::new(InMemoryServerConfig::new());
    let sync = ClineSync::new(Arc::clone(&registry), Arc::clone(&settings), export());
    let mut events = registry.subscribe();
    registry
        .connect(
            &id("mongodb"),
            Some(CredentialSet::primary(
                ServiceKind::MongoDb,
                "mongodb://localhost:27017",
            )),
        )
        .await;
    registry
        .update_config(&id("mongodb"), ServiceConfig::new().with("database", "inventory"))
        .await;

    while let Ok(event) = events.try_recv() {
        sync.handle(&event).await.expect("event handled");
    }

    let entry = settings
        .entry("devhub-mongodb")
        .expect("entry lookup")
        .expect("entry exported");
    assert_eq!(
        entry.env.get("MONGODB_DATABASE").map(String::as_str),
        Some("inventory")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resync_exports_connected_services_only(scripted: ScriptedRegistry) {
    let ScriptedRegistry { registry, .. } = scripted;
    register_github(&registry).await;
    registry
        .register_service(RegisterServiceRequest::new("stripe", "Stripe", ServiceKind::Stripe))
        .await
        .expect("registration should succeed");
    registry.connect(&id("github"), github_token("ghp_abc")).await;
    let settings = Arc::new(InMemoryServerConfig::new());
    settings
        .upsert("filesystem-local", &foreign_entry())
        .await
        .expect("foreign entry stored");
    let sync = ClineSync::new(Arc::clone(&registry), Arc::clone(&settings), export());

    let exported = sync.sync_all_connected().await.expect("resync");

    assert_eq!(exported, 1);
    assert_eq!(
        sync.exported_entries().await.expect("names"),
        vec!["devhub-github".to_owned()]
    );
    assert!(has_entry(&settings, "filesystem-local"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settings_file_keeps_unrelated_content(scripted: ScriptedRegistry) {
    let ScriptedRegistry { registry, .. } = scripted;
    register_github(&registry).await;
    registry.connect(&id("github"), github_token("ghp_abc")).await;
    let scratch = ScratchDir::new("cline");
    scratch
        .open()
        .write(
            "cline_mcp_settings.json",
            r#"{"theme": "dark", "mcpServers": {"filesystem-local": {"command": "npx"}}}"#,
        )
        .expect("seed settings file");
    let path: Utf8PathBuf = scratch.path().join("cline_mcp_settings.json");
    let sync = ClineSync::new(
        Arc::clone(&registry),
        Arc::new(ClineSettingsFile::new(path)),
        export(),
    );

    sync.sync_all_connected().await.expect("resync");

    let raw = scratch
        .open()
        .read_to_string("cline_mcp_settings.json")
        .expect("settings file readable");
    let document: serde_json::Value = serde_json::from_str(&raw).expect("settings stay JSON");
    assert_eq!(document.get("theme"), Some(&serde_json::json!("dark")));
    let servers = document
        .get("mcpServers")
        .and_then(serde_json::Value::as_object)
        .expect("servers map");
    assert!(servers.contains_key("filesystem-local"));
    assert!(servers.contains_key("devhub-github"));
}

fn foreign_entry() -> ExternalServerEntry {
    ExternalServerEntry {
        command: "npx".to_owned(),
        args: vec!["@modelcontextprotocol/server-filesystem".to_owned()],
        env: BTreeMap::new(),
        disabled: false,
        auto_approve: Vec::new(),
    }
}
