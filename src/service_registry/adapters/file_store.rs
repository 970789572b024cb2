//! JSON file store for the registry snapshot.

use crate::service_registry::{
    domain::{PersistedRegistryState, STATE_KEY},
    ports::{ServiceStateStore, ServiceStateStoreError, ServiceStateStoreResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

/// Stores the snapshot as `<storage_dir>/devhubState.json`.
///
/// Writes go to a sibling temporary file that is renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStateStore {
    storage_dir: Utf8PathBuf,
}

impl JsonFileStateStore {
    /// Creates a store rooted at `storage_dir`. The directory is created on
    /// first save.
    #[must_use]
    pub fn new(storage_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn storage_dir(&self) -> &Utf8Path {
        &self.storage_dir
    }

    /// Returns the snapshot file name.
    #[must_use]
    pub fn file_name() -> String {
        format!("{STATE_KEY}.json")
    }
}

fn read_snapshot(storage_dir: &Utf8Path) -> io::Result<Option<String>> {
    let dir = match Dir::open_ambient_dir(storage_dir, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    match dir.read_to_string(JsonFileStateStore::file_name()) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn write_snapshot(storage_dir: &Utf8Path, bytes: &[u8]) -> io::Result<()> {
    Dir::create_ambient_dir_all(storage_dir, ambient_authority())?;
    let dir = Dir::open_ambient_dir(storage_dir, ambient_authority())?;
    let final_name = JsonFileStateStore::file_name();
    let temp_name = format!("{final_name}.tmp");
    dir.write(&temp_name, bytes)?;
    dir.rename(&temp_name, &dir, &final_name)
}

#[async_trait]
impl ServiceStateStore for JsonFileStateStore {
    async fn load(&self) -> ServiceStateStoreResult<Option<PersistedRegistryState>> {
        let storage_dir = self.storage_dir.clone();
        let contents = tokio::task::spawn_blocking(move || read_snapshot(&storage_dir))
            .await
            .map_err(ServiceStateStoreError::persistence)?
            .map_err(ServiceStateStoreError::persistence)?;

        contents
            .map(|raw| {
                serde_json::from_str(&raw).map_err(ServiceStateStoreError::invalid_persisted_data)
            })
            .transpose()
    }

    async fn save(&self, state: &PersistedRegistryState) -> ServiceStateStoreResult<()> {
        let bytes = serde_json::to_vec_pretty(state).map_err(ServiceStateStoreError::persistence)?;
        let storage_dir = self.storage_dir.clone();
        tokio::task::spawn_blocking(move || write_snapshot(&storage_dir, &bytes))
            .await
            .map_err(ServiceStateStoreError::persistence)?
            .map_err(ServiceStateStoreError::persistence)
    }
}
