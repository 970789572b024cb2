//! Built-in service catalog registered on first activation.

use super::registry::RegisterServiceRequest;
use crate::service_registry::domain::ServiceKind;

/// Returns one registration per known service kind.
///
/// Ids are the server bundle directory names, so `21st-dev` keeps its
/// historical spelling.
#[must_use]
pub fn default_catalog() -> Vec<RegisterServiceRequest> {
    ServiceKind::ALL
        .into_iter()
        .map(|kind| {
            RegisterServiceRequest::new(kind.server_directory(), kind.display_name(), kind)
        })
        .collect()
}
