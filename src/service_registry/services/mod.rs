//! Application services for service registration, connection lifecycle, and
//! settings export.

mod catalog;
mod cline_sync;
mod events;
mod registry;

pub use catalog::default_catalog;
pub use cline_sync::{ClineExport, ClineSync, ClineSyncError, ClineSyncResult, MCP_MODE_VARIABLE};
pub use events::{DEFAULT_EVENT_CAPACITY, EventBus};
pub use registry::{
    ConnectOutcome, DisconnectOutcome, RegisterServiceRequest, RegistryOverview,
    ServiceRegistry, ServiceRegistryError, ServiceRegistryResult,
};
