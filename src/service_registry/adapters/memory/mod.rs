//! In-memory adapters for tests and ephemeral hosts.

mod credentials;
mod server_settings;
mod state_store;

pub use credentials::StaticCredentialSource;
pub use server_settings::InMemoryServerConfig;
pub use state_store::InMemoryStateStore;
