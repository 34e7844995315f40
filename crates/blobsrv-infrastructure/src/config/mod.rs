//! Configuration
//!
//! Typed configuration plus a Figment-based loader merging defaults, a
//! TOML or JSON file and `BLOBSRV__` environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, validate_app_config};
pub use types::{AppConfig, LoggingConfig, PrefixConfig, ServerConfig};
