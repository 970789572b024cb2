//! Persisted registry snapshot.

use super::{ServiceDescriptor, ServiceStatus};
use serde::{Deserialize, Serialize};

/// Key under which the registry snapshot is stored.
pub const STATE_KEY: &str = "devhubState";

/// Full registry snapshot written on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRegistryState {
    /// Every registered descriptor.
    #[serde(default)]
    pub servers: Vec<ServiceDescriptor>,
    /// Whether any connect attempt was in flight when the snapshot was taken.
    #[serde(default)]
    pub is_connecting: bool,
}

impl PersistedRegistryState {
    /// Builds a snapshot from descriptors, deriving `is_connecting`.
    #[must_use]
    pub fn from_servers(servers: Vec<ServiceDescriptor>) -> Self {
        let is_connecting = servers
            .iter()
            .any(|server| server.status() == ServiceStatus::Connecting);
        Self {
            servers,
            is_connecting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_extension_state_record() {
        let raw = json!({
            "servers": [{
                "id": "github",
                "name": "GitHub",
                "type": "github",
                "status": "connected",
                "config": {"token": "ghp_x"},
                "lastConnected": "2024-05-01T10:00:00Z"
            }],
            "isConnecting": false
        });

        let state: PersistedRegistryState =
            serde_json::from_value(raw).expect("state should decode");

        let server = state.servers.first().expect("one server");
        assert_eq!(server.id().as_str(), "github");
        assert!(server.last_connected_at().is_some());
        assert!(!state.is_connecting);
    }

    #[test]
    fn missing_fields_default() {
        let state: PersistedRegistryState =
            serde_json::from_value(json!({})).expect("empty record decodes");
        assert!(state.servers.is_empty());
    }
}
