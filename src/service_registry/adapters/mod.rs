//! Adapter implementations for the service registry ports.

pub mod connectors;
pub mod memory;

mod cline;
mod credentials;
mod file_store;
mod scripted;

pub use cline::{CLINE_SETTINGS_RELATIVE_PATH, ClineSettingsFile};
pub use credentials::{ConfigCredentialSource, EnvCredentialSource};
pub use file_store::JsonFileStateStore;
pub use scripted::{ScriptedConnector, ScriptedConnectors};
