//! Error handling types

use thiserror::Error;

use crate::constants::CHAIN_SEPARATOR;
use crate::value_objects::ConstructorKind;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for blobsrv
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Generic error from external sources
    #[error("Generic error: {0}")]
    Generic(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// A foreign error annotated with what was being attempted
    #[error("{message}")]
    Context {
        /// What was being attempted, followed by the source's message
        message: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration-related error (simple form)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// Configuration-related error (with source)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No constructor is registered for a declared type
    #[error("{kind} type \"{type_name}\" not known or loaded")]
    UnknownType {
        /// Which constructor table was consulted
        kind: ConstructorKind,
        /// The declared type name
        type_name: String,
    },

    /// A declared type is in neither constructor table
    #[error("type \"{type_name}\" is not a known storage or handler type")]
    UnregisteredType {
        /// The declared type name
        type_name: String,
    },

    /// A prefix was requested that the configuration never declared
    #[error("no handler configured for prefix \"{prefix}\"")]
    UnknownPrefix {
        /// The requested prefix
        prefix: String,
    },

    /// No configured prefix declares the requested handler type
    #[error("requested handler type \"{handler_type}\" not loaded")]
    HandlerTypeNotFound {
        /// The requested handler type
        handler_type: String,
    },

    /// The instance behind a prefix lacks the requested capability
    #[error("prefix \"{prefix}\" is a {actual}, not a {expected}")]
    CapabilityMismatch {
        /// The requested prefix
        prefix: String,
        /// Capability the caller required
        expected: ConstructorKind,
        /// Capability the instance provides
        actual: ConstructorKind,
    },

    /// Handler construction depends on itself
    #[error("handler construction cycle: {}", chain.join(CHAIN_SEPARATOR))]
    Cycle {
        /// Prefixes from the repeated prefix back to itself
        chain: Vec<String>,
    },

    /// An earlier construction of this prefix failed
    #[error("handler \"{prefix}\" failed to load: {message}")]
    PreviouslyFailed {
        /// The failed prefix
        prefix: String,
        /// Message of the original failure
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        let message: String = message.into();
        Self::Generic(message.into())
    }

    /// Wrap `source`, keeping it reachable through `Error::source`
    pub fn with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Context {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// I/O error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error (simple)
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Loader error creation methods
impl Error {
    /// Create an unknown type error
    pub fn unknown_type<S: Into<String>>(kind: ConstructorKind, type_name: S) -> Self {
        Self::UnknownType {
            kind,
            type_name: type_name.into(),
        }
    }

    /// Create an error for a type missing from both constructor tables
    pub fn unregistered_type<S: Into<String>>(type_name: S) -> Self {
        Self::UnregisteredType {
            type_name: type_name.into(),
        }
    }

    /// Create an unknown prefix error
    pub fn unknown_prefix<S: Into<String>>(prefix: S) -> Self {
        Self::UnknownPrefix {
            prefix: prefix.into(),
        }
    }

    /// Create a capability mismatch error
    pub fn capability_mismatch<S: Into<String>>(
        prefix: S,
        expected: ConstructorKind,
        actual: ConstructorKind,
    ) -> Self {
        Self::CapabilityMismatch {
            prefix: prefix.into(),
            expected,
            actual,
        }
    }

    /// True for errors that reflect a bad configuration rather than a
    /// failing constructor
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::Configuration { .. }
                | Self::UnknownType { .. }
                | Self::UnregisteredType { .. }
                | Self::UnknownPrefix { .. }
                | Self::CapabilityMismatch { .. }
                | Self::Cycle { .. }
        )
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::generic(s)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::generic(s)
    }
}
