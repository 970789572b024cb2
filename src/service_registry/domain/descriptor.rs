//! Service descriptor aggregate root.

use super::{ServiceConfig, ServiceDomainError, ServiceId, ServiceKind, ServiceName, ServiceStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted record describing one configured external service and its
/// last-known connection status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    id: ServiceId,
    name: ServiceName,
    #[serde(rename = "type")]
    kind: ServiceKind,
    status: ServiceStatus,
    #[serde(default)]
    config: ServiceConfig,
    #[serde(
        rename = "lastConnected",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    last_connected_at: Option<DateTime<Utc>>,
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    last_error: Option<String>,
}

impl ServiceDescriptor {
    /// Creates a disconnected descriptor.
    #[must_use]
    pub const fn new(
        id: ServiceId,
        name: ServiceName,
        kind: ServiceKind,
        config: ServiceConfig,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            status: ServiceStatus::Disconnected,
            config,
            last_connected_at: None,
            last_error: None,
        }
    }

    /// Returns the service identifier.
    #[must_use]
    pub const fn id(&self) -> &ServiceId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the service kind.
    #[must_use]
    pub const fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Returns the connection status.
    #[must_use]
    pub const fn status(&self) -> ServiceStatus {
        self.status
    }

    /// Returns the configuration map.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns when the service last entered `connected`.
    #[must_use]
    pub const fn last_connected_at(&self) -> Option<DateTime<Utc>> {
        self.last_connected_at
    }

    /// Returns the error recorded by the last failed connect.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Marks a connect attempt as in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::InvalidStatusTransition`] when a connect
    /// is already in flight.
    pub fn begin_connecting(&mut self) -> Result<(), ServiceDomainError> {
        self.transition_to(ServiceStatus::Connecting)?;
        self.last_error = None;
        Ok(())
    }

    /// Marks the in-flight connect as successful.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::InvalidStatusTransition`] when no connect
    /// is in flight.
    pub fn mark_connected(
        &mut self,
        connected_at: DateTime<Utc>,
    ) -> Result<(), ServiceDomainError> {
        self.transition_to(ServiceStatus::Connected)?;
        self.last_connected_at = Some(connected_at);
        self.last_error = None;
        Ok(())
    }

    /// Marks the in-flight connect as failed with a diagnostic message.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::InvalidStatusTransition`] when no connect
    /// is in flight.
    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), ServiceDomainError> {
        self.transition_to(ServiceStatus::Error)?;
        let normalized = message.into().trim().to_owned();
        self.last_error = Some(if normalized.is_empty() {
            "connection failed".to_owned()
        } else {
            normalized
        });
        Ok(())
    }

    /// Marks the service as disconnected, either after a declined connect or
    /// an explicit disconnect.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::InvalidStatusTransition`] when the service
    /// is already disconnected.
    pub fn mark_disconnected(&mut self) -> Result<(), ServiceDomainError> {
        self.transition_to(ServiceStatus::Disconnected)?;
        self.last_error = None;
        Ok(())
    }

    /// Shallow-merges a configuration patch.
    pub fn merge_config(&mut self, partial: ServiceConfig) {
        self.config.merge(partial);
    }

    /// Settles state that cannot survive a restart.
    #[must_use]
    pub fn restored(mut self) -> Self {
        let status = self.status.restored();
        if status != self.status {
            self.status = status;
            self.last_error = None;
        }
        self
    }

    fn transition_to(&mut self, target: ServiceStatus) -> Result<(), ServiceDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(ServiceDomainError::InvalidStatusTransition {
                from: self.status.as_str().to_owned(),
                to: target.as_str().to_owned(),
            });
        }

        self.status = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn github() -> ServiceDescriptor {
        ServiceDescriptor::new(
            ServiceId::new("gh").expect("valid id"),
            ServiceName::new("GitHub").expect("valid name"),
            ServiceKind::GitHub,
            ServiceConfig::new(),
        )
    }

    #[test]
    fn new_descriptor_is_disconnected() {
        let descriptor = github();
        assert_eq!(descriptor.status(), ServiceStatus::Disconnected);
        assert!(descriptor.last_connected_at().is_none());
        assert!(descriptor.last_error().is_none());
    }

    #[test]
    fn failed_connect_records_error_and_retry_clears_it() {
        let mut descriptor = github();
        descriptor.begin_connecting().expect("connect can start");
        descriptor
            .mark_failed("Bad credentials")
            .expect("failure can be recorded");
        assert_eq!(descriptor.status(), ServiceStatus::Error);
        assert_eq!(descriptor.last_error(), Some("Bad credentials"));

        descriptor.begin_connecting().expect("retry can start");
        assert!(descriptor.last_error().is_none());
        descriptor
            .mark_connected(Utc::now())
            .expect("success can be recorded");
        assert_eq!(descriptor.status(), ServiceStatus::Connected);
        assert!(descriptor.last_connected_at().is_some());
    }

    #[test]
    fn blank_failure_message_gets_placeholder() {
        let mut descriptor = github();
        descriptor.begin_connecting().expect("connect can start");
        descriptor.mark_failed("  ").expect("failure can be recorded");
        assert_eq!(descriptor.last_error(), Some("connection failed"));
    }

    #[test]
    fn second_connect_while_connecting_is_rejected() {
        let mut descriptor = github();
        descriptor.begin_connecting().expect("connect can start");
        assert!(matches!(
            descriptor.begin_connecting(),
            Err(ServiceDomainError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn disconnecting_a_disconnected_descriptor_is_rejected() {
        let mut descriptor = github();
        assert!(descriptor.mark_disconnected().is_err());
    }

    #[test]
    fn serializes_with_extension_state_field_names() {
        let mut descriptor = github();
        descriptor.begin_connecting().expect("connect can start");
        descriptor.mark_failed("boom").expect("failure can be recorded");

        let encoded = serde_json::to_value(&descriptor).expect("descriptor serializes");
        assert_eq!(
            encoded,
            json!({
                "id": "gh",
                "name": "GitHub",
                "type": "github",
                "status": "error",
                "config": {},
                "error": "boom"
            })
        );
    }

    #[test]
    fn restored_descriptor_settles_connecting() {
        let mut descriptor = github();
        descriptor.begin_connecting().expect("connect can start");
        let restored = descriptor.restored();
        assert_eq!(restored.status(), ServiceStatus::Disconnected);
    }
}
