//! Host settings for the DevHub service registry.
//!
//! Settings come from an optional JSON file and are then overridden by
//! environment variables. A representative file is:
//!
//! ```json
//! {
//!   "storage_dir": "/home/dev/.local/share/devhub",
//!   "namespace": "devhub",
//!   "server_command": "node",
//!   "server_root": "/opt/devhub/mcp-servers",
//!   "http_timeout_secs": 30,
//!   "cline_sync": true
//! }
//! ```

use crate::service_registry::adapters::ClineSettingsFile;
use crate::service_registry::adapters::connectors::ConnectorOptions;
use crate::service_registry::services::ClineExport;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Overrides the registry state directory.
pub const STORAGE_DIR_ENV: &str = "DEVHUB_STORAGE_DIR";
/// Overrides the Cline settings file location.
pub const CLINE_SETTINGS_ENV: &str = "DEVHUB_CLINE_SETTINGS";
/// Overrides the standalone server bundle directory.
pub const SERVER_ROOT_ENV: &str = "DEVHUB_SERVER_ROOT";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// Settings file path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid JSON of the expected shape.
    #[error("failed to parse settings from {path}: {source}")]
    Parse {
        /// Settings file path.
        path: Utf8PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// No usable default state directory exists on this platform.
    #[error("cannot determine a UTF-8 data directory; set {STORAGE_DIR_ENV}")]
    NoStorageDir,
}

/// Runtime settings of a DevHub host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevHubSettings {
    /// Directory holding the persisted registry state.
    pub storage_dir: Option<Utf8PathBuf>,
    /// Prefix of exported Cline entries.
    pub namespace: String,
    /// Cline settings file; defaults to the per-user location.
    pub cline_settings_path: Option<Utf8PathBuf>,
    /// Executable that runs standalone server bundles.
    pub server_command: String,
    /// Directory holding standalone server bundles.
    pub server_root: Option<Utf8PathBuf>,
    /// Timeout of connector verification requests.
    pub http_timeout_secs: u64,
    /// Whether connected services are mirrored into Cline settings.
    pub cline_sync: bool,
}

impl Default for DevHubSettings {
    fn default() -> Self {
        Self {
            storage_dir: None,
            namespace: "devhub".to_owned(),
            cline_settings_path: None,
            server_command: "node".to_owned(),
            server_root: None,
            http_timeout_secs: 30,
            cline_sync: true,
        }
    }
}

impl DevHubSettings {
    /// Reads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file cannot be read or decoded.
    pub fn load(path: &Utf8Path) -> Result<Self, SettingsError> {
        let read_error = |source| SettingsError::Read {
            path: path.to_owned(),
            source,
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| read_error(std::io::Error::other("settings path has no file name")))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let contents = dir.read_to_string(file_name).map_err(read_error)?;
        serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`. Blank values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(dir) = read(STORAGE_DIR_ENV) {
            self.storage_dir = Some(dir.into());
        }
        if let Some(path) = read(CLINE_SETTINGS_ENV) {
            self.cline_settings_path = Some(path.into());
        }
        if let Some(root) = read(SERVER_ROOT_ENV) {
            self.server_root = Some(root.into());
        }
        self
    }

    /// Returns the registry state directory.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoStorageDir`] when none is configured and the
    /// platform data directory is unavailable.
    pub fn resolved_storage_dir(&self) -> Result<Utf8PathBuf, SettingsError> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
            .map(|dir| dir.join("devhub"))
            .ok_or(SettingsError::NoStorageDir)
    }

    /// Returns the Cline settings file, if one can be located.
    #[must_use]
    pub fn resolved_cline_settings(&self) -> Option<ClineSettingsFile> {
        self.cline_settings_path
            .clone()
            .or_else(ClineSettingsFile::default_path)
            .map(ClineSettingsFile::new)
    }

    /// Returns how exported Cline entries launch server bundles.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoStorageDir`] when no server root is
    /// configured and the state directory cannot be resolved.
    pub fn cline_export(&self) -> Result<ClineExport, SettingsError> {
        let server_root = self.server_root.clone().map_or_else(
            || {
                self.resolved_storage_dir()
                    .map(|dir| dir.join("mcp-servers"))
            },
            Ok,
        )?;
        Ok(ClineExport::new(server_root)
            .with_command(self.server_command.as_str())
            .with_namespace(self.namespace.as_str()))
    }

    /// Returns connector options derived from these settings.
    #[must_use]
    pub const fn connector_options(&self) -> ConnectorOptions {
        ConnectorOptions {
            request_timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: DevHubSettings =
            serde_json::from_str(r#"{"namespace": "hub"}"#).expect("settings parse");

        assert_eq!(settings.namespace, "hub");
        assert_eq!(settings.server_command, "node");
        assert_eq!(settings.http_timeout_secs, 30);
        assert!(settings.cline_sync);
    }

    #[test]
    fn path_fields_round_trip_through_json() {
        let settings: DevHubSettings = serde_json::from_str(
            r#"{"storage_dir": "/srv/devhub", "cline_settings_path": "/home/dev/cline.json"}"#,
        )
        .expect("settings parse");

        assert_eq!(settings.storage_dir, Some(Utf8PathBuf::from("/srv/devhub")));
        let encoded = serde_json::to_value(&settings).expect("settings encode");
        assert_eq!(
            encoded.get("cline_settings_path"),
            Some(&serde_json::json!("/home/dev/cline.json"))
        );
        assert_eq!(encoded.get("server_root"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn environment_overrides_win_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (STORAGE_DIR_ENV, "/var/lib/devhub"),
            (CLINE_SETTINGS_ENV, "  "),
        ]);
        let settings = DevHubSettings {
            cline_settings_path: Some("/etc/cline.json".into()),
            ..DevHubSettings::default()
        }
        .with_overrides(|name| env.get(name).map(|value| (*value).to_owned()));

        assert_eq!(
            settings.resolved_storage_dir().expect("storage dir"),
            Utf8PathBuf::from("/var/lib/devhub")
        );
        assert_eq!(
            settings.cline_settings_path,
            Some(Utf8PathBuf::from("/etc/cline.json"))
        );
    }

    #[test]
    fn server_root_defaults_below_storage_dir() {
        let settings = DevHubSettings {
            storage_dir: Some("/data".into()),
            ..DevHubSettings::default()
        };

        let export = settings.cline_export().expect("export layout");

        assert_eq!(export.server_root, Utf8PathBuf::from("/data/mcp-servers"));
        assert_eq!(export.namespace, "devhub");
    }
}
