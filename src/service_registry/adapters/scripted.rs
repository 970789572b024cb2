//! Scripted connector adapter for deterministic lifecycle flows.

use crate::service_registry::{
    domain::{CredentialSet, ServiceDescriptor, ServiceKind, ToolCallError, ToolDefinition},
    ports::{Connector, ConnectorError, ConnectorFactories, ConnectorResult},
};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

#[derive(Debug, Default)]
struct Script {
    failure: Option<ConnectorError>,
    delay: Option<Duration>,
    disconnect_delay: Option<Duration>,
    tools: Vec<ToolDefinition>,
    last_credentials: Option<CredentialSet>,
}

#[derive(Debug, Default)]
struct Shared {
    script: RwLock<Script>,
    built: AtomicUsize,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    live: AtomicUsize,
    peak_live: AtomicUsize,
}

/// Factory for connectors whose outcome is set by the caller.
///
/// Every built connector is a fresh instance with its own session flag, while
/// the script and call counters are shared. This adapter never performs I/O,
/// which makes it suitable for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnectors {
    shared: Arc<Shared>,
}

impl ScriptedConnectors {
    /// Creates a script whose connects succeed immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_script<T>(&self, apply: impl FnOnce(&mut Script) -> T) -> T {
        apply(
            &mut self
                .shared
                .script
                .write()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Makes subsequent connects fail with `failure`, or succeed with `None`.
    pub fn set_failure(&self, failure: Option<ConnectorError>) {
        self.with_script(|script| script.failure = failure);
    }

    /// Delays every connect by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.with_script(|script| script.delay = delay);
    }

    /// Delays every disconnect by `delay`. The connector counts as live
    /// until the delay has passed.
    pub fn set_disconnect_delay(&self, delay: Option<Duration>) {
        self.with_script(|script| script.disconnect_delay = delay);
    }

    /// Sets the tool catalog of built connectors.
    pub fn set_tools(&self, tools: Vec<ToolDefinition>) {
        self.with_script(|script| script.tools = tools);
    }

    /// Returns the credentials passed to the most recent connect.
    #[must_use]
    pub fn last_credentials(&self) -> Option<CredentialSet> {
        self.with_script(|script| script.last_credentials.clone())
    }

    /// Returns how many connectors were built.
    #[must_use]
    pub fn built_count(&self) -> usize {
        self.shared.built.load(Ordering::SeqCst)
    }

    /// Returns how many connects were attempted.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.shared.connects.load(Ordering::SeqCst)
    }

    /// Returns how many disconnects were issued.
    #[must_use]
    pub fn disconnect_count(&self) -> usize {
        self.shared.disconnects.load(Ordering::SeqCst)
    }

    /// Returns how many built connectors currently hold a session.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    /// Returns the largest number of connectors that held a session at once.
    #[must_use]
    pub fn peak_live_count(&self) -> usize {
        self.shared.peak_live.load(Ordering::SeqCst)
    }

    /// Builds a fresh connector for `kind`.
    #[must_use]
    pub fn build(&self, kind: ServiceKind) -> Arc<dyn Connector> {
        self.shared.built.fetch_add(1, Ordering::SeqCst);
        Arc::new(ScriptedConnector {
            kind,
            shared: Arc::clone(&self.shared),
            connected: AtomicBool::new(false),
        })
    }

    /// Returns a factory table routing every kind to this script.
    #[must_use]
    pub fn factories(&self) -> ConnectorFactories {
        let mut factories = ConnectorFactories::new();
        for kind in ServiceKind::ALL {
            let scripted = self.clone();
            factories.register(kind, move |descriptor: &ServiceDescriptor| {
                scripted.build(descriptor.kind())
            });
        }
        factories
    }
}

/// Connector instance built by [`ScriptedConnectors`].
#[derive(Debug)]
pub struct ScriptedConnector {
    kind: ServiceKind,
    shared: Arc<Shared>,
    connected: AtomicBool,
}

impl ScriptedConnector {
    fn script<T>(&self, read: impl FnOnce(&Script) -> T) -> T {
        read(&self.shared.script.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn end_session(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.shared.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    fn kind(&self) -> ServiceKind {
        self.kind
    }

    async fn connect(&self, credentials: &CredentialSet) -> ConnectorResult<()> {
        self.shared.connects.fetch_add(1, Ordering::SeqCst);
        self.end_session();
        self.shared
            .script
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .last_credentials = Some(credentials.clone());

        if let Some(delay) = self.script(|script| script.delay) {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = self.script(|script| script.failure.clone()) {
            return Err(failure);
        }
        self.connected.store(true, Ordering::SeqCst);
        let live = self.shared.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.peak_live.fetch_max(live, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.shared.disconnects.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.script(|script| script.disconnect_delay) {
            tokio::time::sleep(delay).await;
        }
        self.end_session();
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.script(|script| script.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolCallError> {
        if !self.is_connected() {
            return Err(ToolCallError::NotConnected(self.kind));
        }
        let tool = self
            .tools()
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| ToolCallError::MethodNotFound(name.to_owned()))?;
        tool.validate_arguments(arguments)?;
        Ok(json!({"tool": name, "arguments": arguments}))
    }
}
