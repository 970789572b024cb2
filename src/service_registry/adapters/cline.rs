//! Cline `cline_mcp_settings.json` adapter.

use crate::service_registry::ports::{
    ExternalServerConfig, ExternalServerConfigError, ExternalServerConfigResult,
    ExternalServerEntry,
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value};
use std::io;
use thiserror::Error;

/// Location of the Cline settings file below the per-user config directory.
pub const CLINE_SETTINGS_RELATIVE_PATH: &str =
    "Code/User/globalStorage/saoudrizwan.claude-dev/settings/cline_mcp_settings.json";

const SERVERS_FIELD: &str = "mcpServers";

#[derive(Debug, Error)]
enum DocumentError {
    #[error("settings path '{0}' has no file name")]
    NoFileName(Utf8PathBuf),
    #[error("expected a JSON object at the document root")]
    RootNotObject,
    #[error("expected 'mcpServers' to be a JSON object")]
    ServersNotObject,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Read-modify-write access to the `mcpServers` map of the Cline settings
/// file. Entries not touched by DevHub are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClineSettingsFile {
    path: Utf8PathBuf,
}

impl ClineSettingsFile {
    /// Uses the settings file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the platform default location, or `None` when the user config
    /// directory cannot be determined or is not UTF-8.
    #[must_use]
    pub fn default_path() -> Option<Utf8PathBuf> {
        let config_dir = Utf8PathBuf::from_path_buf(dirs::config_dir()?).ok()?;
        Some(config_dir.join(CLINE_SETTINGS_RELATIVE_PATH))
    }

    /// Returns the settings file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    async fn modify<F>(&self, change: F) -> ExternalServerConfigResult<()>
    where
        F: FnOnce(&mut Map<String, Value>) + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let (parent, file_name) = split_path(&path)?;
            Dir::create_ambient_dir_all(parent, ambient_authority())
                .map_err(ExternalServerConfigError::io)?;
            let dir = Dir::open_ambient_dir(parent, ambient_authority())
                .map_err(ExternalServerConfigError::io)?;
            let mut root = read_document(&dir, file_name)?;
            let servers =
                servers_mut(&mut root).map_err(ExternalServerConfigError::invalid_document)?;
            change(servers);
            write_document(&dir, file_name, &root)
        })
        .await
        .map_err(ExternalServerConfigError::io)?
    }
}

fn split_path(path: &Utf8Path) -> ExternalServerConfigResult<(&Utf8Path, &str)> {
    let file_name = path.file_name().ok_or_else(|| {
        ExternalServerConfigError::invalid_document(DocumentError::NoFileName(path.to_owned()))
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, file_name))
}

fn read_document(dir: &Dir, file_name: &str) -> ExternalServerConfigResult<Map<String, Value>> {
    let raw = match dir.read_to_string(file_name) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(err) => return Err(ExternalServerConfigError::io(err)),
    };
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ExternalServerConfigError::invalid_document(
            DocumentError::RootNotObject,
        )),
        Err(err) => Err(ExternalServerConfigError::invalid_document(
            DocumentError::Json(err),
        )),
    }
}

fn servers_mut(root: &mut Map<String, Value>) -> Result<&mut Map<String, Value>, DocumentError> {
    root.entry(SERVERS_FIELD)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or(DocumentError::ServersNotObject)
}

fn write_document(
    dir: &Dir,
    file_name: &str,
    root: &Map<String, Value>,
) -> ExternalServerConfigResult<()> {
    let bytes =
        serde_json::to_vec_pretty(root).map_err(ExternalServerConfigError::invalid_document)?;
    let temp_name = format!("{file_name}.tmp");
    dir.write(&temp_name, bytes).map_err(ExternalServerConfigError::io)?;
    dir.rename(&temp_name, dir, file_name)
        .map_err(ExternalServerConfigError::io)
}

#[async_trait]
impl ExternalServerConfig for ClineSettingsFile {
    async fn upsert(
        &self,
        name: &str,
        entry: &ExternalServerEntry,
    ) -> ExternalServerConfigResult<()> {
        let key = name.to_owned();
        let value =
            serde_json::to_value(entry).map_err(ExternalServerConfigError::invalid_document)?;
        self.modify(move |servers| {
            servers.insert(key, value);
        })
        .await
    }

    async fn remove(&self, name: &str) -> ExternalServerConfigResult<()> {
        let key = name.to_owned();
        self.modify(move |servers| {
            servers.remove(&key);
        })
        .await
    }

    async fn entry_names(&self) -> ExternalServerConfigResult<Vec<String>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let (parent, file_name) = split_path(&path)?;
            let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
                Ok(dir) => dir,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(err) => return Err(ExternalServerConfigError::io(err)),
            };
            let mut root = read_document(&dir, file_name)?;
            let servers =
                servers_mut(&mut root).map_err(ExternalServerConfigError::invalid_document)?;
            Ok(servers.keys().cloned().collect())
        })
        .await
        .map_err(ExternalServerConfigError::io)?
    }
}
