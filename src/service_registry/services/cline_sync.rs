//! Mirrors connected services into a third-party MCP client's settings.

use super::registry::ServiceRegistry;
use crate::service_registry::{
    domain::{LifecycleEvent, ServiceDescriptor, ServiceId, ServiceStatus},
    ports::{
        ExternalServerConfig, ExternalServerConfigError, ExternalServerEntry, ServiceStateStore,
    },
};
use camino::Utf8PathBuf;
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Environment variable telling standalone servers to speak stdio.
pub const MCP_MODE_VARIABLE: &str = "MCP_MODE";

/// How exported entries launch the standalone server bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClineExport {
    /// Executable that runs a server bundle.
    pub command: String,
    /// Directory holding one sub-directory per server bundle.
    pub server_root: Utf8PathBuf,
    /// Prefix of every exported entry name.
    pub namespace: String,
}

impl ClineExport {
    /// Creates an export layout running bundles under `server_root` with
    /// `node` and the `devhub` namespace.
    #[must_use]
    pub fn new(server_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            command: "node".to_owned(),
            server_root: server_root.into(),
            namespace: "devhub".to_owned(),
        }
    }

    /// Overrides the launch command.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Overrides the entry name prefix.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Returns the entry name for a service.
    #[must_use]
    pub fn entry_name(&self, service_id: &ServiceId) -> String {
        format!("{}-{service_id}", self.namespace)
    }

    /// Builds the launch entry for a service.
    #[must_use]
    pub fn entry_for(&self, descriptor: &ServiceDescriptor) -> ExternalServerEntry {
        let script = self
            .server_root
            .join(descriptor.kind().server_directory())
            .join("index.js");
        let mut env: BTreeMap<String, String> = descriptor
            .kind()
            .environment_bindings()
            .iter()
            .filter_map(|(field, variable)| {
                descriptor
                    .config()
                    .get_str(field)
                    .map(|value| ((*variable).to_owned(), value.to_owned()))
            })
            .collect();
        env.insert(MCP_MODE_VARIABLE.to_owned(), "stdio".to_owned());

        ExternalServerEntry {
            command: self.command.clone(),
            args: vec![script.into_string()],
            env,
            disabled: false,
            auto_approve: Vec::new(),
        }
    }
}

/// Errors raised while mirroring services.
#[derive(Debug, Error)]
pub enum ClineSyncError {
    /// The external settings could not be updated.
    #[error(transparent)]
    Settings(#[from] ExternalServerConfigError),
}

/// Result type for sync operations.
pub type ClineSyncResult<T> = Result<T, ClineSyncError>;

/// Observer keeping external MCP settings in step with the registry.
///
/// Transitions into `connected` add or refresh an entry and transitions into
/// `disconnected` remove it. `connecting` and `error` are ignored. Events are
/// hints: the registry is re-read before any entry changes.
pub struct ClineSync<S, C, E>
where
    S: ServiceStateStore,
    C: Clock + Send + Sync,
    E: ExternalServerConfig,
{
    registry: Arc<ServiceRegistry<S, C>>,
    settings: Arc<E>,
    export: ClineExport,
}

impl<S, C, E> ClineSync<S, C, E>
where
    S: ServiceStateStore + 'static,
    C: Clock + Send + Sync + 'static,
    E: ExternalServerConfig + 'static,
{
    /// Creates an observer writing to `settings`.
    #[must_use]
    pub const fn new(
        registry: Arc<ServiceRegistry<S, C>>,
        settings: Arc<E>,
        export: ClineExport,
    ) -> Self {
        Self {
            registry,
            settings,
            export,
        }
    }

    /// Returns the export layout.
    #[must_use]
    pub const fn export(&self) -> &ClineExport {
        &self.export
    }

    /// Applies one lifecycle event.
    ///
    /// # Errors
    ///
    /// Returns [`ClineSyncError::Settings`] when the settings cannot be
    /// written.
    pub async fn handle(&self, event: &LifecycleEvent) -> ClineSyncResult<()> {
        match event {
            LifecycleEvent::StatusChanged {
                service_id,
                status: ServiceStatus::Connected,
            }
            | LifecycleEvent::ConfigUpdated { service_id } => {
                self.export_if_connected(service_id).await
            }
            LifecycleEvent::StatusChanged {
                service_id,
                status: ServiceStatus::Disconnected,
            } => self.remove_unless_connected(service_id).await,
            LifecycleEvent::StatusChanged { .. } | LifecycleEvent::Registered { .. } => Ok(()),
        }
    }

    async fn remove_unless_connected(&self, service_id: &ServiceId) -> ClineSyncResult<()> {
        if self.registry.status(service_id) == ServiceStatus::Connected {
            debug!(service_id = %service_id, "stale disconnect event; entry kept");
            return Ok(());
        }
        let name = self.export.entry_name(service_id);
        self.settings.remove(&name).await?;
        debug!(service_id = %service_id, entry = %name, "removed MCP settings entry");
        Ok(())
    }

    async fn export_if_connected(&self, service_id: &ServiceId) -> ClineSyncResult<()> {
        let Some(descriptor) = self
            .registry
            .service(service_id)
            .filter(|descriptor| descriptor.status() == ServiceStatus::Connected)
        else {
            return Ok(());
        };
        let name = self.export.entry_name(service_id);
        self.settings
            .upsert(&name, &self.export.entry_for(&descriptor))
            .await?;
        debug!(service_id = %service_id, entry = %name, "exported MCP settings entry");
        Ok(())
    }

    /// Re-exports every connected service. Returns how many were written.
    ///
    /// # Errors
    ///
    /// Returns the first settings write failure.
    pub async fn sync_all_connected(&self) -> ClineSyncResult<usize> {
        let connected: Vec<ServiceDescriptor> = self
            .registry
            .list_services()
            .into_iter()
            .filter(|descriptor| descriptor.status() == ServiceStatus::Connected)
            .collect();
        for descriptor in &connected {
            self.settings
                .upsert(
                    &self.export.entry_name(descriptor.id()),
                    &self.export.entry_for(descriptor),
                )
                .await?;
        }
        info!(exported = connected.len(), "synchronised MCP settings");
        Ok(connected.len())
    }

    /// Lists entry names in this observer's namespace, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ClineSyncError::Settings`] when the settings cannot be read.
    pub async fn exported_entries(&self) -> ClineSyncResult<Vec<String>> {
        let prefix = format!("{}-", self.export.namespace);
        let mut names: Vec<String> = self
            .settings
            .entry_names()
            .await?
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Runs the observer on a background task until the registry closes its
    /// event bus. Failures are logged and never stop the loop.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        let events = self.registry.subscribe();
        tokio::spawn(self.run(events))
    }

    async fn run(self, mut events: broadcast::Receiver<LifecycleEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(err) = self.handle(&event).await {
                        warn!(
                            service_id = %event.service_id(),
                            error = %err,
                            "MCP settings sync failed"
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "MCP settings sync lagged; resynchronising");
                    if let Err(err) = self.sync_all_connected().await {
                        warn!(error = %err, "MCP settings resync failed");
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!("MCP settings sync stopped");
    }
}
