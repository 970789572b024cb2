//! Activation and deactivation of a full host.

use super::helpers::{ScratchDir, eventually, github_token, id};
use camino::Utf8PathBuf;
use devhub::host::DevHub;
use devhub::service_registry::{
    adapters::{ClineSettingsFile, ScriptedConnectors},
    domain::{ServiceKind, ServiceStatus},
    ports::ExternalServerConfig,
};
use devhub::settings::DevHubSettings;

fn settings(scratch: &ScratchDir, cline_sync: bool) -> DevHubSettings {
    DevHubSettings {
        storage_dir: Some(scratch.path().join("state")),
        cline_settings_path: Some(cline_path(scratch)),
        server_root: Some(Utf8PathBuf::from("/opt/devhub/servers")),
        cline_sync,
        ..DevHubSettings::default()
    }
}

fn cline_path(scratch: &ScratchDir) -> Utf8PathBuf {
    scratch.path().join("cline").join("cline_mcp_settings.json")
}

async fn exported(file: &ClineSettingsFile) -> Vec<String> {
    file.entry_names().await.unwrap_or_default()
}

#[tokio::test(flavor = "multi_thread")]
async fn activation_registers_catalog_and_exports_connections() {
    let scratch = ScratchDir::new("host");
    let connectors = ScriptedConnectors::new();
    let host = DevHub::activate_with(settings(&scratch, true), connectors.factories())
        .await
        .expect("host activates");
    let cline = ClineSettingsFile::new(cline_path(&scratch));

    assert_eq!(host.registry().list_services().len(), ServiceKind::ALL.len());
    host.registry()
        .connect(&id("github"), github_token("ghp_abc"))
        .await;
    assert!(
        eventually(|| async { exported(&cline).await.contains(&"devhub-github".to_owned()) })
            .await
    );

    host.deactivate().await;

    assert_eq!(exported(&cline).await, vec!["devhub-github".to_owned()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn reactivation_restores_services_disconnected() {
    let scratch = ScratchDir::new("reactivate");
    let connectors = ScriptedConnectors::new();
    let first = DevHub::activate_with(settings(&scratch, false), connectors.factories())
        .await
        .expect("host activates");
    first
        .registry()
        .connect(&id("github"), github_token("ghp_abc"))
        .await;
    first.deactivate().await;

    let second = DevHub::activate_with(settings(&scratch, false), connectors.factories())
        .await
        .expect("host reactivates");

    assert_eq!(
        second.registry().list_services().len(),
        ServiceKind::ALL.len()
    );
    let github = second.registry().service(&id("github")).expect("restored");
    assert_eq!(github.status(), ServiceStatus::Disconnected);
    assert_eq!(github.config().get_str("token"), Some("ghp_abc"));
    second.deactivate().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn disabled_sync_leaves_cline_settings_untouched() {
    let scratch = ScratchDir::new("nosync");
    let connectors = ScriptedConnectors::new();
    let host = DevHub::activate_with(settings(&scratch, false), connectors.factories())
        .await
        .expect("host activates");

    host.registry()
        .connect(&id("github"), github_token("ghp_abc"))
        .await;
    host.deactivate().await;

    assert!(!scratch.open().exists("cline"));
}
