//! Tracing subscriber setup for DevHub hosts.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "devhub=info";

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// Returns `false` when a global subscriber was already installed.
#[must_use]
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
