//! Handler instances
//!
//! A constructed prefix is either a storage engine or an HTTP handler.
//! Callers narrow to the capability they need and get a precise
//! [`Error::CapabilityMismatch`] instead of a failed cast.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ports::{Handler, Storage};

/// Which constructor table a type name lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstructorKind {
    /// Produces a [`Storage`]
    Storage,
    /// Produces an HTTP [`Handler`]
    Handler,
}

impl fmt::Display for ConstructorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage => write!(f, "Storage"),
            Self::Handler => write!(f, "Handler"),
        }
    }
}

/// A live instance owned by a loader and shared with its consumers
#[derive(Clone)]
pub enum HandlerInstance {
    /// Storage-capable instance
    Storage(Arc<dyn Storage>),
    /// HTTP-handler-capable instance
    Handler(Arc<dyn Handler>),
}

impl HandlerInstance {
    /// Capability carried by this instance
    pub fn kind(&self) -> ConstructorKind {
        match self {
            Self::Storage(_) => ConstructorKind::Storage,
            Self::Handler(_) => ConstructorKind::Handler,
        }
    }

    /// Registered type name reported by the instance itself
    pub fn type_name(&self) -> &str {
        match self {
            Self::Storage(storage) => storage.storage_type(),
            Self::Handler(handler) => handler.handler_type(),
        }
    }

    /// Borrow the storage capability, if present
    pub fn as_storage(&self) -> Option<&Arc<dyn Storage>> {
        match self {
            Self::Storage(storage) => Some(storage),
            Self::Handler(_) => None,
        }
    }

    /// Borrow the handler capability, if present
    pub fn as_handler(&self) -> Option<&Arc<dyn Handler>> {
        match self {
            Self::Handler(handler) => Some(handler),
            Self::Storage(_) => None,
        }
    }

    /// Narrow to storage, naming `prefix` in the mismatch error
    pub fn into_storage(self, prefix: &str) -> Result<Arc<dyn Storage>> {
        match self {
            Self::Storage(storage) => Ok(storage),
            Self::Handler(_) => Err(Error::capability_mismatch(
                prefix,
                ConstructorKind::Storage,
                ConstructorKind::Handler,
            )),
        }
    }

    /// Narrow to an HTTP handler, naming `prefix` in the mismatch error
    pub fn into_handler(self, prefix: &str) -> Result<Arc<dyn Handler>> {
        match self {
            Self::Handler(handler) => Ok(handler),
            Self::Storage(_) => Err(Error::capability_mismatch(
                prefix,
                ConstructorKind::Handler,
                ConstructorKind::Storage,
            )),
        }
    }

    /// Whether both values point at the same underlying object
    pub fn ptr_eq(&self, other: &HandlerInstance) -> bool {
        match (self, other) {
            (Self::Storage(a), Self::Storage(b)) => Arc::ptr_eq(a, b),
            (Self::Handler(a), Self::Handler(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<dyn Storage>> for HandlerInstance {
    fn from(storage: Arc<dyn Storage>) -> Self {
        Self::Storage(storage)
    }
}

impl From<Arc<dyn Handler>> for HandlerInstance {
    fn from(handler: Arc<dyn Handler>) -> Self {
        Self::Handler(handler)
    }
}

impl fmt::Debug for HandlerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerInstance")
            .field("kind", &self.kind())
            .field("type_name", &self.type_name())
            .finish()
    }
}
