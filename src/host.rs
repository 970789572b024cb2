//! Activation and deactivation of a DevHub registry host.

use crate::service_registry::{
    adapters::{ClineSettingsFile, JsonFileStateStore, connectors::default_factories},
    ports::ConnectorFactories,
    services::{ClineSync, ClineSyncError, ServiceRegistry, ServiceRegistryError, default_catalog},
};
use crate::settings::{DevHubSettings, SettingsError};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Registry persisted to a JSON file with the system clock.
pub type DefaultRegistry = ServiceRegistry<JsonFileStateStore, DefaultClock>;

/// Cline sync observer over the default registry.
pub type DefaultClineSync = ClineSync<JsonFileStateStore, DefaultClock, ClineSettingsFile>;

/// Errors raised while activating a host.
#[derive(Debug, Error)]
pub enum HostError {
    /// Settings could not be resolved.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The built-in catalog could not be registered.
    #[error(transparent)]
    Registry(#[from] ServiceRegistryError),
    /// Cline settings could not be synchronised.
    #[error(transparent)]
    ClineSync(#[from] ClineSyncError),
    /// No Cline settings location is configured or discoverable.
    #[error("no Cline settings location available")]
    NoClineSettings,
}

/// A running registry together with its background observers.
pub struct DevHub {
    registry: Arc<DefaultRegistry>,
    settings: DevHubSettings,
    sync_task: Option<JoinHandle<()>>,
}

impl DevHub {
    /// Activates a host with the built-in connectors.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when settings cannot be resolved or the built-in
    /// catalog cannot be registered.
    pub async fn activate(settings: DevHubSettings) -> Result<Self, HostError> {
        let factories = default_factories(settings.connector_options());
        Self::activate_with(settings, factories).await
    }

    /// Activates a host with a caller-supplied connector table.
    ///
    /// Restores persisted descriptors, registers catalog entries missing from
    /// them, and starts the Cline sync observer when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when settings cannot be resolved or the built-in
    /// catalog cannot be registered.
    pub async fn activate_with(
        settings: DevHubSettings,
        factories: ConnectorFactories,
    ) -> Result<Self, HostError> {
        let storage_dir = settings.resolved_storage_dir()?;
        let registry = Arc::new(
            ServiceRegistry::open(
                Arc::new(JsonFileStateStore::new(storage_dir.clone())),
                Arc::new(factories),
                Arc::new(DefaultClock),
            )
            .await,
        );
        let added = registry.bootstrap(default_catalog()).await?;

        let sync_task = if settings.cline_sync {
            build_cline_sync(&registry, &settings)
                .inspect_err(|err| warn!(error = %err, "Cline sync disabled"))
                .ok()
                .map(ClineSync::spawn)
        } else {
            None
        };
        info!(
            storage_dir = %storage_dir,
            added,
            cline_sync = sync_task.is_some(),
            "DevHub activated"
        );
        Ok(Self {
            registry,
            settings,
            sync_task,
        })
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<DefaultRegistry> {
        &self.registry
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &DevHubSettings {
        &self.settings
    }

    /// Builds a Cline sync observer over this host's registry.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NoClineSettings`] when no settings file can be
    /// located, or [`HostError::Settings`] when the export layout cannot be
    /// resolved.
    pub fn cline_sync(&self) -> Result<DefaultClineSync, HostError> {
        build_cline_sync(&self.registry, &self.settings)
    }

    /// Stops observers and shuts the registry down.
    ///
    /// The Cline sync observer stops first, so entries exported for
    /// connected services outlive the host.
    pub async fn deactivate(self) {
        if let Some(task) = self.sync_task {
            task.abort();
            if let Err(err) = task.await
                && !err.is_cancelled()
            {
                warn!(error = %err, "Cline sync task ended abnormally");
            }
        }
        self.registry.shutdown().await;
        debug!("DevHub deactivated");
    }
}

fn build_cline_sync(
    registry: &Arc<DefaultRegistry>,
    settings: &DevHubSettings,
) -> Result<DefaultClineSync, HostError> {
    let file = settings
        .resolved_cline_settings()
        .ok_or(HostError::NoClineSettings)?;
    let export = settings.cline_export()?;
    Ok(ClineSync::new(Arc::clone(registry), Arc::new(file), export))
}
