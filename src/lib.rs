//! DevHub: service connector registry for MCP integrations.
//!
//! This crate registers external developer services (GitHub, Stripe, MongoDB,
//! and others), drives each through a connection lifecycle, persists their
//! descriptors, and mirrors connected services into third-party MCP client
//! settings.
//!
//! # Architecture
//!
//! DevHub follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, HTTP APIs, etc.)
//!
//! # Modules
//!
//! - [`service_registry`]: Descriptors, lifecycle, connectors, and events
//! - [`host`]: Activation and deactivation of a running registry
//! - [`settings`]: Host configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod host;
pub mod service_registry;
pub mod settings;
pub mod telemetry;
