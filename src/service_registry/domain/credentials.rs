//! Credential bundles handed to connectors.

use super::{ServiceConfig, ServiceKind};
use std::collections::BTreeMap;
use std::fmt;

/// Named credential values for one connect attempt.
///
/// Keys follow the descriptor configuration keys (`token`, `apiKey`,
/// `projectUrl`, ...). `Debug` output redacts every value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    values: BTreeMap<String, String>,
}

impl CredentialSet {
    /// Creates an empty credential set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a credential set holding only the primary credential of `kind`.
    #[must_use]
    pub fn primary(kind: ServiceKind, secret: impl Into<String>) -> Self {
        Self::new().with(kind.credential_field(), secret)
    }

    /// Adds or replaces one credential value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Collects every string value of a descriptor configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        let values = config
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_owned())))
            .collect();
        Self { values }
    }

    /// Returns the trimmed, non-blank value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Returns the primary credential of `kind`.
    #[must_use]
    pub fn secret_for(&self, kind: ServiceKind) -> Option<&str> {
        self.get(kind.credential_field())
    }

    /// Returns whether this set amounts to a declined credential prompt for
    /// `kind`, meaning its primary credential is missing or blank.
    #[must_use]
    pub fn is_declined_for(&self, kind: ServiceKind) -> bool {
        self.secret_for(kind).is_none()
    }

    /// Converts the credentials into a configuration patch.
    #[must_use]
    pub fn to_config(&self) -> ServiceConfig {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns the credential keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.values.keys().map(|key| (key, "<redacted>")))
            .finish()
    }
}
