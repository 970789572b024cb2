//! Lifecycle events published by the service registry.

use super::{ServiceId, ServiceKind, ServiceStatus};

/// Notification that registry state changed.
///
/// Events mean "recheck state": observers re-read the registry rather than
/// treating the payload as authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A descriptor was inserted or overwritten.
    Registered {
        /// Registered service.
        service_id: ServiceId,
        /// Service kind.
        kind: ServiceKind,
    },
    /// A service moved to a new status.
    StatusChanged {
        /// Affected service.
        service_id: ServiceId,
        /// Status after the transition.
        status: ServiceStatus,
    },
    /// A service configuration was merged.
    ConfigUpdated {
        /// Affected service.
        service_id: ServiceId,
    },
}

impl LifecycleEvent {
    /// Returns the affected service.
    #[must_use]
    pub const fn service_id(&self) -> &ServiceId {
        match self {
            Self::Registered { service_id, .. }
            | Self::StatusChanged { service_id, .. }
            | Self::ConfigUpdated { service_id } => service_id,
        }
    }
}
