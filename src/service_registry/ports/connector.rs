//! Connector capability port and the per-kind factory table.

use crate::service_registry::domain::{
    CredentialSet, ServiceDescriptor, ServiceKind, ToolCallError, ToolDefinition,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Client for one external service family.
///
/// A fresh connector is built for every connect attempt. Implementations keep
/// their session behind interior mutability so the registry can share them.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the service family this connector talks to.
    fn kind(&self) -> ServiceKind;

    /// Validates credentials and performs at most one verification call.
    ///
    /// On failure no session is retained.
    async fn connect(&self, credentials: &CredentialSet) -> ConnectorResult<()>;

    /// Releases the session. Never fails.
    async fn disconnect(&self);

    /// Reports whether a session is held.
    fn is_connected(&self) -> bool;

    /// Returns the tool catalog.
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Runs one tool against the live session.
    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Value, ToolCallError>;
}

/// Errors returned by connector connect attempts.
#[derive(Debug, Clone, Error)]
pub enum ConnectorError {
    /// Credentials failed local validation.
    #[error("invalid {kind} credentials: {reason}")]
    InvalidCredentials {
        /// Service family.
        kind: ServiceKind,
        /// Validation failure.
        reason: String,
    },

    /// The remote verification call rejected the credentials.
    #[error("{kind} rejected the connection: {reason}")]
    CheckFailed {
        /// Service family.
        kind: ServiceKind,
        /// Remote diagnostic.
        reason: String,
    },

    /// Network or I/O failure while verifying.
    #[error("connector transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConnectorError {
    /// Builds a local validation failure.
    pub fn invalid_credentials(kind: ServiceKind, reason: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            kind,
            reason: reason.into(),
        }
    }

    /// Builds a remote verification failure.
    pub fn check_failed(kind: ServiceKind, reason: impl Into<String>) -> Self {
        Self::CheckFailed {
            kind,
            reason: reason.into(),
        }
    }

    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

/// Constructor producing a fresh connector for a descriptor.
pub type ConnectorFactory = Arc<dyn Fn(&ServiceDescriptor) -> Arc<dyn Connector> + Send + Sync>;

/// Table mapping each service kind to its connector constructor.
#[derive(Clone, Default)]
pub struct ConnectorFactories {
    factories: HashMap<ServiceKind, ConnectorFactory>,
}

impl ConnectorFactories {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the constructor for `kind`.
    #[must_use]
    pub fn with<F>(mut self, kind: ServiceKind, factory: F) -> Self
    where
        F: Fn(&ServiceDescriptor) -> Arc<dyn Connector> + Send + Sync + 'static,
    {
        self.register(kind, factory);
        self
    }

    /// Registers or replaces the constructor for `kind`.
    pub fn register<F>(&mut self, kind: ServiceKind, factory: F)
    where
        F: Fn(&ServiceDescriptor) -> Arc<dyn Connector> + Send + Sync + 'static,
    {
        self.factories.insert(kind, Arc::new(factory));
    }

    /// Builds a connector for `descriptor`, or `None` when its kind has no
    /// registered constructor.
    #[must_use]
    pub fn build(&self, descriptor: &ServiceDescriptor) -> Option<Arc<dyn Connector>> {
        self.factories
            .get(&descriptor.kind())
            .map(|factory| factory(descriptor))
    }

    /// Returns whether `kind` has a registered constructor.
    #[must_use]
    pub fn supports(&self, kind: ServiceKind) -> bool {
        self.factories.contains_key(&kind)
    }
}

impl fmt::Debug for ConnectorFactories {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.factories.keys().map(|kind| kind.as_str()).collect();
        kinds.sort_unstable();
        formatter
            .debug_struct("ConnectorFactories")
            .field("kinds", &kinds)
            .finish()
    }
}
