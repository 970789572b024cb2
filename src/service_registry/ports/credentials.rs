//! Credential acquisition port.

use crate::service_registry::domain::{CredentialSet, ServiceDescriptor};
use async_trait::async_trait;

/// Supplies credentials for a connect attempt.
///
/// Returning `None`, or a set whose primary credential is blank, means the
/// prompt was declined and the connect resolves to `disconnected`.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Acquires credentials for `service`.
    async fn acquire(&self, service: &ServiceDescriptor) -> Option<CredentialSet>;
}
