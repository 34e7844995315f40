//! Infrastructure layer constants
//!
//! Domain-specific constants are defined in `blobsrv_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "blobsrv.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "blobsrv";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "BLOBSRV";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Default listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3179";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "BLOBSRV_LOG";
