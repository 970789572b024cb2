//! Identifier and validated-name types for registered services.

use super::ServiceDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a registered service, for example `github`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a validated service identifier.
    ///
    /// The input is trimmed. Identifiers end up in external configuration keys
    /// (`devhub-<id>`), so whitespace and path separators are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, ServiceDomainError> {
        let normalized = value.into().trim().to_owned();

        if normalized.is_empty() {
            return Err(ServiceDomainError::EmptyServiceId);
        }

        let is_valid = !normalized
            .chars()
            .any(|character| character.is_whitespace() || matches!(character, '/' | '\\'));
        if !is_valid {
            return Err(ServiceDomainError::InvalidServiceId(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Display name of a registered service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated display name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceDomainError::EmptyServiceName`] when the trimmed input
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ServiceDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(ServiceDomainError::EmptyServiceName);
        }
        Ok(Self(normalized))
    }

    /// Returns the display name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier of one live connection, regenerated on every successful connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Creates a new random connection identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("github", "github")]
    #[case("  mongodb ", "mongodb")]
    #[case("21st-dev", "21st-dev")]
    fn service_id_is_trimmed(#[case] input: &str, #[case] expected: &str) {
        let id = ServiceId::new(input).expect("valid service id");
        assert_eq!(id.as_str(), expected);
    }

    #[rstest]
    #[case("", ServiceDomainError::EmptyServiceId)]
    #[case("   ", ServiceDomainError::EmptyServiceId)]
    #[case("git hub", ServiceDomainError::InvalidServiceId("git hub".to_owned()))]
    #[case("a/b", ServiceDomainError::InvalidServiceId("a/b".to_owned()))]
    fn service_id_rejects_invalid_input(
        #[case] input: &str,
        #[case] expected: ServiceDomainError,
    ) {
        assert_eq!(ServiceId::new(input), Err(expected));
    }

    #[test]
    fn service_name_rejects_blank_input() {
        assert_eq!(
            ServiceName::new(" \t"),
            Err(ServiceDomainError::EmptyServiceName)
        );
    }
}
