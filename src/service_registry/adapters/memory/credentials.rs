//! Fixed credential answers keyed by service id.

use crate::service_registry::{
    domain::{CredentialSet, ServiceDescriptor, ServiceId},
    ports::CredentialSource,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Credential source answering from a fixed table. Unknown ids decline.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialSource {
    answers: HashMap<ServiceId, CredentialSet>,
}

impl StaticCredentialSource {
    /// Creates a source that declines every prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers prompts for `service_id` with `credentials`.
    #[must_use]
    pub fn with(mut self, service_id: ServiceId, credentials: CredentialSet) -> Self {
        self.answers.insert(service_id, credentials);
        self
    }
}

#[async_trait]
impl CredentialSource for StaticCredentialSource {
    async fn acquire(&self, service: &ServiceDescriptor) -> Option<CredentialSet> {
        self.answers.get(service.id()).cloned()
    }
}
