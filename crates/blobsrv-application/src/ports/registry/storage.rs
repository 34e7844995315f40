//! Storage Constructor Registry
//!
//! Auto-registration slice for storage engines.
//! Engines register themselves via `#[linkme::distributed_slice]` and are
//! copied into the process-wide [`ConstructorRegistry`](super::ConstructorRegistry)
//! the first time it is accessed.

use std::sync::Arc;

use blobsrv_domain::error::Result;
use blobsrv_domain::ports::Storage;
use blobsrv_domain::value_objects::ConfigObj;

use crate::ports::loader::Loader;

/// Constructor function for a storage engine
pub type StorageConstructorFn = fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Storage>>;

/// Registry entry for storage engines
///
/// Each engine submits one of these to [`STORAGE_CONSTRUCTORS`].
pub struct StorageConstructorEntry {
    /// Unique type name (e.g., "memory", "filesystem")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Builds an instance from its configuration
    pub constructor: StorageConstructorFn,
}

// Auto-collection via linkme distributed slices - engines submit entries at compile time
#[linkme::distributed_slice]
pub static STORAGE_CONSTRUCTORS: [StorageConstructorEntry] = [..];
