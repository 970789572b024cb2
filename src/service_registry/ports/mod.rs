//! Port contracts for the service connector registry.

mod connector;
mod credentials;
mod external;
mod store;

pub use connector::{
    Connector, ConnectorError, ConnectorFactories, ConnectorFactory, ConnectorResult,
};
pub use credentials::CredentialSource;
pub use external::{
    ExternalServerConfig, ExternalServerConfigError, ExternalServerConfigResult,
    ExternalServerEntry,
};
pub use store::{ServiceStateStore, ServiceStateStoreError, ServiceStateStoreResult};
