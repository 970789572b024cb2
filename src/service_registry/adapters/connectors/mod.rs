//! Built-in connectors for every service kind.

mod catalog;
mod filesystem;
mod http;
mod mongodb;
mod offline;
mod rest;
mod session;

pub use filesystem::FileSystemConnector;
pub use mongodb::MongoDbConnector;
pub use offline::OfflineConnector;
pub use rest::{API_URL_FIELD, RestConnector};

use crate::service_registry::domain::{ServiceDescriptor, ServiceKind};
use crate::service_registry::ports::{Connector, ConnectorFactories};
use std::sync::Arc;
use std::time::Duration;

/// Tunables shared by the built-in connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorOptions {
    /// Upper bound for one verification request or probe.
    pub request_timeout: Duration,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Builds the factory table covering every [`ServiceKind`].
#[must_use]
pub fn default_factories(options: ConnectorOptions) -> ConnectorFactories {
    let mut factories = ConnectorFactories::new();
    for kind in ServiceKind::ALL {
        factories.register(kind, move |descriptor: &ServiceDescriptor| {
            build_connector(descriptor, options)
        });
    }
    factories
}

fn build_connector(
    descriptor: &ServiceDescriptor,
    options: ConnectorOptions,
) -> Arc<dyn Connector> {
    let kind = descriptor.kind();
    if let Some(connector) = RestConnector::for_descriptor(descriptor, options.request_timeout) {
        return Arc::new(connector);
    }
    if let Some(connector) = OfflineConnector::for_kind(kind) {
        return Arc::new(connector);
    }
    // Only mongodb and filesystem remain once both tables are consulted.
    match kind {
        ServiceKind::MongoDb => Arc::new(MongoDbConnector::new(options.request_timeout)),
        _ => Arc::new(FileSystemConnector::new()),
    }
}
