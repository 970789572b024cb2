//! Domain model for the service connector registry.
//!
//! Descriptors, kinds, the connection status state machine, credentials,
//! tool catalogs, and lifecycle events. No I/O happens at this layer.

mod config;
mod credentials;
mod descriptor;
mod error;
mod event;
mod ids;
mod kind;
mod state;
mod status;
mod tool;

pub use config::ServiceConfig;
pub use credentials::CredentialSet;
pub use descriptor::ServiceDescriptor;
pub use error::{ParseServiceKindError, ParseServiceStatusError, ServiceDomainError};
pub use event::LifecycleEvent;
pub use ids::{ConnectionId, ServiceId, ServiceName};
pub use kind::{API_KEY_FIELD, ServiceKind};
pub use state::{PersistedRegistryState, STATE_KEY};
pub use status::ServiceStatus;
pub use tool::{ToolCallError, ToolDefinition, ToolErrorCode};
