//! Port for third-party MCP client settings that mirror connected services.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for external settings operations.
pub type ExternalServerConfigResult<T> = Result<T, ExternalServerConfigError>;

/// One `mcpServers` entry launching a stdio MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalServerEntry {
    /// Executable to launch.
    pub command: String,
    /// Command-line arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment passed to the server process.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Whether the client should skip this entry.
    #[serde(default)]
    pub disabled: bool,
    /// Tools the client may call without confirmation.
    #[serde(default)]
    pub auto_approve: Vec<String>,
}

/// Writable list of MCP server entries owned by another tool.
#[async_trait]
pub trait ExternalServerConfig: Send + Sync {
    /// Inserts or replaces the entry stored under `name`.
    async fn upsert(&self, name: &str, entry: &ExternalServerEntry)
    -> ExternalServerConfigResult<()>;

    /// Removes the entry stored under `name`. Missing entries are not an error.
    async fn remove(&self, name: &str) -> ExternalServerConfigResult<()>;

    /// Returns every entry name currently stored.
    async fn entry_names(&self) -> ExternalServerConfigResult<Vec<String>>;
}

/// Errors returned by external settings adapters.
#[derive(Debug, Clone, Error)]
pub enum ExternalServerConfigError {
    /// The settings document is not valid JSON of the expected shape.
    #[error("invalid MCP settings document: {0}")]
    InvalidDocument(Arc<dyn std::error::Error + Send + Sync>),

    /// Reading or writing the settings failed.
    #[error("MCP settings I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExternalServerConfigError {
    /// Wraps a decoding failure.
    pub fn invalid_document(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidDocument(Arc::new(err))
    }

    /// Wraps an I/O failure.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}
