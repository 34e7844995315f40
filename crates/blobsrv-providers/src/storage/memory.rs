//! In-memory storage engine
//!
//! Concurrent map of blob reference to bytes. Useful for tests and as a
//! scratch tier in front of durable engines.
//!
//! ## Example
//!
//! ```ignore
//! [prefixes."/bs/"]
//! handler = "storage-memory"
//! ```

use std::sync::Arc;

use blobsrv_application::ports::Loader;
use blobsrv_domain::error::Result;
use blobsrv_domain::ports::Storage;
use blobsrv_domain::value_objects::ConfigObj;
use dashmap::DashMap;

use crate::utils::validate_blob_ref;

/// In-memory storage engine
#[derive(Default)]
pub struct MemoryStorage {
    blobs: DashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from handler arguments. The engine takes none.
    pub fn from_config(config: &ConfigObj) -> Result<Self> {
        config.reader().validate()?;
        Ok(Self::new())
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether no blob is stored
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn storage_type(&self) -> &str {
        "memory"
    }

    fn receive(&self, blob_ref: &str, data: &[u8]) -> Result<()> {
        validate_blob_ref(blob_ref)?;
        self.blobs
            .entry(blob_ref.to_string())
            .or_insert_with(|| data.to_vec());
        Ok(())
    }

    fn fetch(&self, blob_ref: &str) -> Result<Option<Vec<u8>>> {
        validate_blob_ref(blob_ref)?;
        Ok(self.blobs.get(blob_ref).map(|entry| entry.value().clone()))
    }

    fn enumerate(&self) -> Result<Vec<String>> {
        let mut refs: Vec<String> = self.blobs.iter().map(|entry| entry.key().clone()).collect();
        refs.sort();
        Ok(refs)
    }

    fn contains(&self, blob_ref: &str) -> Result<bool> {
        validate_blob_ref(blob_ref)?;
        Ok(self.blobs.contains_key(blob_ref))
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use blobsrv_application::ports::registry::{STORAGE_CONSTRUCTORS, StorageConstructorEntry};

#[linkme::distributed_slice(STORAGE_CONSTRUCTORS)]
static MEMORY_STORAGE: StorageConstructorEntry = StorageConstructorEntry {
    name: "memory",
    description: "Process-local in-memory blob storage",
    constructor: |_loader: &dyn Loader, config: &ConfigObj| {
        Ok(Arc::new(MemoryStorage::from_config(config)?))
    },
};
