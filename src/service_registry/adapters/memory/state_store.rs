//! In-memory registry snapshot store.

use crate::service_registry::{
    domain::PersistedRegistryState,
    ports::{ServiceStateStore, ServiceStateStoreError, ServiceStateStoreResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory snapshot store that counts writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    snapshot: Option<PersistedRegistryState>,
    save_count: usize,
    fail_saves: bool,
}

fn lock_error(err: &impl std::fmt::Display) -> ServiceStateStoreError {
    ServiceStateStoreError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: PersistedRegistryState) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryStoreState {
                snapshot: Some(snapshot),
                ..InMemoryStoreState::default()
            })),
        }
    }

    /// Returns the last saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn snapshot(&self) -> ServiceStateStoreResult<Option<PersistedRegistryState>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.snapshot.clone())
    }

    /// Returns how many successful saves happened.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn save_count(&self) -> ServiceStateStoreResult<usize> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.save_count)
    }

    /// Makes subsequent saves fail.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when lock acquisition fails.
    pub fn set_failing(&self, failing: bool) -> ServiceStateStoreResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        state.fail_saves = failing;
        Ok(())
    }
}

#[async_trait]
impl ServiceStateStore for InMemoryStateStore {
    async fn load(&self) -> ServiceStateStoreResult<Option<PersistedRegistryState>> {
        self.snapshot()
    }

    async fn save(&self, snapshot: &PersistedRegistryState) -> ServiceStateStoreResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        if state.fail_saves {
            return Err(ServiceStateStoreError::persistence(std::io::Error::other(
                "storage unavailable",
            )));
        }
        state.snapshot = Some(snapshot.clone());
        state.save_count += 1;
        Ok(())
    }
}
