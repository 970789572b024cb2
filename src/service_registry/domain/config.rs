//! Free-form per-service configuration map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration attached to a service descriptor.
///
/// Values are opaque to the registry; connectors interpret them. Updates merge
/// shallowly and never replace the whole map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfig(Map<String, Value>);

impl ServiceConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Shallow-merges `partial` into this configuration. Keys present in
    /// `partial` win; all other keys are kept.
    pub fn merge(&mut self, partial: Self) {
        self.0.extend(partial.0);
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the trimmed string stored under `key`, ignoring blank and
    /// non-string values.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns whether the configuration has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the underlying JSON map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ServiceConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ServiceConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_keeps_existing_keys() {
        let mut config = ServiceConfig::new().with("a", 1);
        config.merge(ServiceConfig::new().with("b", 2));

        assert_eq!(serde_json::to_value(&config).expect("serializes"), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn merge_overwrites_shared_keys_shallowly() {
        let mut config = ServiceConfig::new().with("nested", json!({"x": 1, "y": 2}));
        config.merge(ServiceConfig::new().with("nested", json!({"x": 3})));

        assert_eq!(config.get("nested"), Some(&json!({"x": 3})));
    }

    #[test]
    fn get_str_ignores_blank_and_non_string_values() {
        let config = ServiceConfig::new()
            .with("blank", "  ")
            .with("number", 7)
            .with("token", " ghp_abc ");

        assert_eq!(config.get_str("blank"), None);
        assert_eq!(config.get_str("number"), None);
        assert_eq!(config.get_str("token"), Some("ghp_abc"));
    }
}
