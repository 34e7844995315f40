//! Configuration types

use std::collections::BTreeMap;
use std::path::PathBuf;

use blobsrv_domain::value_objects::ConfigObj;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_LOG_LEVEL};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Handler instances keyed by URL prefix
    pub prefixes: BTreeMap<String, PrefixConfig>,
}

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// One declared handler instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixConfig {
    /// Registered type name, optionally `storage-` prefixed
    pub handler: String,

    /// Type-specific arguments, passed verbatim to the constructor
    #[serde(default, alias = "handlerArgs")]
    pub handler_args: ConfigObj,
}

impl PrefixConfig {
    /// Declare a handler of type `handler` with no arguments
    pub fn new(handler: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            handler_args: ConfigObj::new(),
        }
    }

    /// Set the handler arguments
    pub fn with_args(mut self, handler_args: ConfigObj) -> Self {
        self.handler_args = handler_args;
        self
    }
}
