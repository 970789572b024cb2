//! Credential sources backed by the environment and stored configuration.

use crate::service_registry::{
    domain::{CredentialSet, ServiceDescriptor},
    ports::CredentialSource,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads credentials from the environment variables the standalone MCP
/// servers use (`GITHUB_TOKEN`, `STRIPE_API_KEY`, ...).
///
/// Values already present in the descriptor configuration fill in any
/// variable that is unset.
#[derive(Clone)]
pub struct EnvCredentialSource {
    lookup: Lookup,
}

impl EnvCredentialSource {
    /// Reads from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lookup: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Reads from a fixed variable table.
    #[must_use]
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self {
            lookup: Arc::new(move |name| variables.get(name).cloned()),
        }
    }
}

impl Default for EnvCredentialSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvCredentialSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("EnvCredentialSource").finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialSource for EnvCredentialSource {
    async fn acquire(&self, service: &ServiceDescriptor) -> Option<CredentialSet> {
        let mut credentials = CredentialSet::from_config(service.config());
        let mut found_any = false;
        for (field, variable) in service.kind().environment_bindings() {
            if let Some(value) = (self.lookup)(variable).filter(|value| !value.trim().is_empty()) {
                credentials = credentials.with(*field, value);
                found_any = true;
            }
        }
        (found_any || !credentials.is_declined_for(service.kind())).then_some(credentials)
    }
}

/// Reuses credentials previously stored in the descriptor configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigCredentialSource;

#[async_trait]
impl CredentialSource for ConfigCredentialSource {
    async fn acquire(&self, service: &ServiceDescriptor) -> Option<CredentialSet> {
        let credentials = CredentialSet::from_config(service.config());
        (!credentials.is_declined_for(service.kind())).then_some(credentials)
    }
}
