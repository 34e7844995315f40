//! # blobsrv infrastructure layer
//!
//! - [`loader`] - resolves a configuration's prefixes into a live handler graph
//! - [`config`] - typed configuration and its Figment-based loader
//! - [`logging`] - tracing subscriber setup
//! - [`error_ext`] - context helpers mapping foreign errors into the domain error

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod loader;
pub mod logging;

pub use config::{AppConfig, ConfigLoader, PrefixConfig};
pub use loader::{ConstructionScope, HandlerLoader, InstanceStatus, LoadedHandlers};
