//! Persistence port for the registry snapshot.

use crate::service_registry::domain::PersistedRegistryState;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for snapshot persistence.
pub type ServiceStateStoreResult<T> = Result<T, ServiceStateStoreError>;

/// Key-value style storage for the single registry snapshot.
#[async_trait]
pub trait ServiceStateStore: Send + Sync {
    /// Reads the stored snapshot, if any.
    async fn load(&self) -> ServiceStateStoreResult<Option<PersistedRegistryState>>;

    /// Overwrites the stored snapshot.
    async fn save(&self, state: &PersistedRegistryState) -> ServiceStateStoreResult<()>;
}

/// Errors returned by snapshot stores.
#[derive(Debug, Clone, Error)]
pub enum ServiceStateStoreError {
    /// Stored data could not be decoded.
    #[error("invalid persisted registry state: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Storage-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServiceStateStoreError {
    /// Wraps a decoding failure.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a storage failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
