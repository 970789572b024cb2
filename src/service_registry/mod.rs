//! Service connector registry for DevHub.
//!
//! Registers external service descriptors, drives each one through the
//! `disconnected`/`connecting`/`connected`/`error` lifecycle, persists the
//! descriptor list, and announces every transition on a typed event bus. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;
