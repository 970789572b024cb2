//! Snapshot files and restart behaviour.

use super::helpers::{ScratchDir, github_token, id, register_github};
use devhub::service_registry::{
    adapters::{JsonFileStateStore, ScriptedConnectors},
    domain::ServiceStatus,
    services::{ConnectOutcome, ServiceRegistry},
};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::sync::Arc;

type FileRegistry = ServiceRegistry<JsonFileStateStore, DefaultClock>;

async fn open(scratch: &ScratchDir, connectors: &ScriptedConnectors) -> FileRegistry {
    ServiceRegistry::open(
        Arc::new(JsonFileStateStore::new(scratch.path().join("state"))),
        Arc::new(connectors.factories()),
        Arc::new(DefaultClock),
    )
    .await
}

fn read_snapshot(scratch: &ScratchDir) -> Value {
    let raw = scratch
        .open()
        .open_dir("state")
        .expect("state dir exists")
        .read_to_string(JsonFileStateStore::file_name())
        .expect("snapshot readable");
    serde_json::from_str(&raw).expect("snapshot is JSON")
}

#[tokio::test(flavor = "multi_thread")]
async fn connected_service_is_restored_without_a_live_connection() {
    let scratch = ScratchDir::new("restart");
    let connectors = ScriptedConnectors::new();
    let first = open(&scratch, &connectors).await;
    register_github(&first).await;
    first.connect(&id("github"), github_token("ghp_abc")).await;

    let snapshot = read_snapshot(&scratch);
    assert_eq!(snapshot.get("isConnecting"), Some(&json!(false)));
    let server = snapshot
        .get("servers")
        .and_then(|servers| servers.get(0))
        .expect("one server");
    assert_eq!(server.get("type"), Some(&json!("github")));
    assert_eq!(server.get("status"), Some(&json!("connected")));
    assert_eq!(server.pointer("/config/token"), Some(&json!("ghp_abc")));
    drop(first);

    let second = open(&scratch, &connectors).await;

    assert_eq!(second.status(&id("github")), ServiceStatus::Connected);
    assert_eq!(second.live_connection_count(), 0);
    assert!(!second.test_connection(&id("github")));
    assert_eq!(
        second.connect(&id("github"), github_token("ghp_abc")).await,
        ConnectOutcome::Connected
    );
    assert!(second.test_connection(&id("github")));
}

#[tokio::test(flavor = "multi_thread")]
async fn interrupted_connect_settles_to_disconnected() {
    let scratch = ScratchDir::new("interrupted");
    let state = scratch.open();
    state.create_dir("state").expect("create state dir");
    state
        .open_dir("state")
        .expect("open state dir")
        .write(
            JsonFileStateStore::file_name(),
            json!({
                "servers": [{
                    "id": "vercel",
                    "name": "Vercel",
                    "type": "vercel",
                    "status": "connecting",
                    "config": {}
                }],
                "isConnecting": true
            })
            .to_string(),
        )
        .expect("seed snapshot");

    let registry = open(&scratch, &ScriptedConnectors::new()).await;

    assert_eq!(registry.status(&id("vercel")), ServiceStatus::Disconnected);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreadable_snapshot_yields_an_empty_registry() {
    let scratch = ScratchDir::new("corrupt");
    let state = scratch.open();
    state.create_dir("state").expect("create state dir");
    state
        .open_dir("state")
        .expect("open state dir")
        .write(JsonFileStateStore::file_name(), "{ not json")
        .expect("seed snapshot");

    let registry = open(&scratch, &ScriptedConnectors::new()).await;

    assert!(registry.list_services().is_empty());
}
