//! In-memory stand-in for a third-party `mcpServers` document.

use crate::service_registry::ports::{
    ExternalServerConfig, ExternalServerConfigError, ExternalServerConfigResult,
    ExternalServerEntry,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// Thread-safe map of MCP server entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServerConfig {
    entries: Arc<RwLock<BTreeMap<String, ExternalServerEntry>>>,
}

fn lock_error(err: &impl std::fmt::Display) -> ExternalServerConfigError {
    ExternalServerConfigError::io(std::io::Error::other(err.to_string()))
}

impl InMemoryServerConfig {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when lock acquisition fails.
    pub fn entry(&self, name: &str) -> ExternalServerConfigResult<Option<ExternalServerEntry>> {
        let entries = self.entries.read().map_err(|err| lock_error(&err))?;
        Ok(entries.get(name).cloned())
    }
}

#[async_trait]
impl ExternalServerConfig for InMemoryServerConfig {
    async fn upsert(
        &self,
        name: &str,
        entry: &ExternalServerEntry,
    ) -> ExternalServerConfigResult<()> {
        let mut entries = self.entries.write().map_err(|err| lock_error(&err))?;
        entries.insert(name.to_owned(), entry.clone());
        Ok(())
    }

    async fn remove(&self, name: &str) -> ExternalServerConfigResult<()> {
        let mut entries = self.entries.write().map_err(|err| lock_error(&err))?;
        entries.remove(name);
        Ok(())
    }

    async fn entry_names(&self) -> ExternalServerConfigResult<Vec<String>> {
        let entries = self.entries.read().map_err(|err| lock_error(&err))?;
        Ok(entries.keys().cloned().collect())
    }
}
