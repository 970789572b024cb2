//! Shared test helpers for registry integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use devhub::service_registry::{
    adapters::{ScriptedConnectors, memory::InMemoryStateStore},
    domain::{CredentialSet, ServiceId, ServiceKind},
    ports::ServiceStateStore,
    services::{RegisterServiceRequest, ServiceRegistry},
};
use mockable::{Clock, DefaultClock};
use rstest::fixture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Registry type backed by the in-memory store.
pub type MemoryRegistry = ServiceRegistry<InMemoryStateStore, DefaultClock>;

/// Registry wired to scripted connectors.
pub struct ScriptedRegistry {
    /// Registry under test.
    pub registry: Arc<MemoryRegistry>,
    /// Script shared by every built connector.
    pub connectors: ScriptedConnectors,
}

/// Provides a registry whose connects succeed unless scripted otherwise.
#[fixture]
pub fn scripted() -> ScriptedRegistry {
    let connectors = ScriptedConnectors::new();
    let registry = ServiceRegistry::new(
        Arc::new(InMemoryStateStore::new()),
        Arc::new(connectors.factories()),
        Arc::new(DefaultClock),
    );
    ScriptedRegistry {
        registry: Arc::new(registry),
        connectors,
    }
}

/// Parses a service id.
#[must_use]
pub fn id(value: &str) -> ServiceId {
    ServiceId::new(value).expect("valid id")
}

/// Registers the GitHub service under id `github`.
pub async fn register_github<S, C>(registry: &ServiceRegistry<S, C>)
where
    S: ServiceStateStore,
    C: Clock + Send + Sync,
{
    registry
        .register_service(RegisterServiceRequest::new(
            "github",
            "GitHub",
            ServiceKind::GitHub,
        ))
        .await
        .expect("registration should succeed");
}

/// Returns a GitHub token credential.
#[must_use]
pub fn github_token(secret: &str) -> Option<CredentialSet> {
    Some(CredentialSet::primary(ServiceKind::GitHub, secret))
}

/// Polls `check` until it holds or two seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Uniquely named directory under the system temp dir, removed on drop.
pub struct ScratchDir {
    parent: Dir,
    name: String,
    path: Utf8PathBuf,
}

impl ScratchDir {
    /// Creates a scratch directory named after `prefix`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let base = Utf8PathBuf::from_path_buf(std::env::temp_dir()).expect("utf-8 temp dir");
        let parent = Dir::open_ambient_dir(&base, ambient_authority()).expect("open temp dir");
        let name = format!("devhub-it-{prefix}-{}", Uuid::new_v4());
        parent.create_dir(&name).expect("create scratch dir");
        let path = base.join(&name);
        Self { parent, name, path }
    }

    /// Returns the absolute path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Opens the directory.
    #[must_use]
    pub fn open(&self) -> Dir {
        self.parent.open_dir(&self.name).expect("open scratch dir")
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        drop(self.parent.remove_dir_all(&self.name));
    }
}
