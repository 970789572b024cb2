//! Error types for service registry domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing service registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceDomainError {
    /// The service identifier is empty after trimming.
    #[error("service id must not be empty")]
    EmptyServiceId,

    /// The service identifier contains whitespace or path separators.
    #[error("service id '{0}' contains invalid characters")]
    InvalidServiceId(String),

    /// The display name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// A tool definition name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// A tool definition description is empty after trimming.
    #[error("tool description must not be empty")]
    EmptyToolDescription,

    /// Transitioning between two statuses is invalid.
    #[error("invalid service status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: String,
        /// Requested target status.
        to: String,
    },
}

/// Error returned while parsing a service kind tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service kind: {0}")]
pub struct ParseServiceKindError(pub String);

/// Error returned while parsing a service status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service status: {0}")]
pub struct ParseServiceStatusError(pub String);
