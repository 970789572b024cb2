//! Shared world state for service lifecycle BDD scenarios.

use std::sync::Arc;

use devhub::service_registry::{
    adapters::{
        ScriptedConnectors,
        connectors::{ConnectorOptions, default_factories},
        memory::InMemoryStateStore,
    },
    domain::{LifecycleEvent, ServiceId, ServiceKind},
    services::{ConnectOutcome, DisconnectOutcome, ServiceRegistry},
};
use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use tokio::sync::broadcast::Receiver;

/// Registry type used by the BDD world.
pub type TestRegistry = ServiceRegistry<InMemoryStateStore, DefaultClock>;

/// Scenario world for service lifecycle behaviour tests.
pub struct LifecycleWorld {
    /// Registry under test. GitHub is scripted; other kinds use the
    /// built-in connectors.
    pub registry: TestRegistry,
    /// Snapshot store behind the registry.
    pub store: Arc<InMemoryStateStore>,
    /// Script driving GitHub connects.
    pub github: ScriptedConnectors,
    /// Subscription opened after the last registration.
    pub events: Option<Receiver<LifecycleEvent>>,
    /// Save count observed right after the last registration.
    pub saves_after_registration: usize,
    /// Outcome of the last connect.
    pub last_connect: Option<ConnectOutcome>,
    /// Outcome of the last disconnect.
    pub last_disconnect: Option<DisconnectOutcome>,
}

impl LifecycleWorld {
    /// Creates a world with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let github = ScriptedConnectors::new();
        let scripted = github.clone();
        let factories = default_factories(ConnectorOptions::default())
            .with(ServiceKind::GitHub, move |descriptor| scripted.build(descriptor.kind()));
        let store = Arc::new(InMemoryStateStore::new());
        let registry = ServiceRegistry::new(
            Arc::clone(&store),
            Arc::new(factories),
            Arc::new(DefaultClock),
        );
        Self {
            registry,
            store,
            github,
            events: None,
            saves_after_registration: 0,
            last_connect: None,
            last_disconnect: None,
        }
    }

    /// Drains published events.
    ///
    /// # Errors
    ///
    /// Returns an error when no subscription was opened.
    pub fn drain_events(&mut self) -> Result<Vec<LifecycleEvent>, eyre::Report> {
        let receiver = self
            .events
            .as_mut()
            .ok_or_else(|| eyre!("no event subscription"))?;
        let mut drained = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            drained.push(event);
        }
        Ok(drained)
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a service id from step text.
///
/// # Errors
///
/// Returns an error when the id is invalid.
pub fn service_id(raw: &str) -> Result<ServiceId, eyre::Report> {
    ServiceId::new(raw).map_err(|err| eyre!("invalid service id '{raw}': {err}"))
}

/// Runs a future to completion on the current multi-threaded runtime.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Provides a fresh world per scenario.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::new()
}
