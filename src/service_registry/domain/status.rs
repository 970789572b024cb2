//! Connection status state machine for registered services.

use super::ParseServiceStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection status of a registered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// No live connection exists.
    Disconnected,
    /// A connect attempt is in flight.
    Connecting,
    /// A live connection exists.
    Connected,
    /// The last connect attempt failed.
    Error,
}

impl ServiceStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// `Connected -> Connecting` covers a descriptor restored as connected
    /// without a live connection behind it.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Disconnected | Self::Error | Self::Connected,
                Self::Connecting
            ) | (
                Self::Connecting,
                Self::Connected | Self::Error | Self::Disconnected
            ) | (Self::Connected | Self::Error, Self::Disconnected)
        )
    }

    /// Returns the status a restored descriptor should carry.
    ///
    /// No connect attempt survives a restart, so `connecting` settles to
    /// `disconnected`.
    #[must_use]
    pub const fn restored(self) -> Self {
        match self {
            Self::Connecting => Self::Disconnected,
            other => other,
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceStatus {
    type Error = ParseServiceStatusError;

    fn try_from(value: &str) -> Result<Self, ParseServiceStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "disconnected" => Ok(Self::Disconnected),
            "connecting" => Ok(Self::Connecting),
            "connected" => Ok(Self::Connected),
            "error" => Ok(Self::Error),
            _ => Err(ParseServiceStatusError(value.to_owned())),
        }
    }
}
