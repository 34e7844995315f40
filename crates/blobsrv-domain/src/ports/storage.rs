//! Storage Port
//!
//! Capability implemented by every storage engine (memory, filesystem,
//! replicated, ...). Blobs are addressed by an opaque blob reference
//! string; the engines decide how to lay them out.

use crate::error::Result;

/// Blob storage capability
pub trait Storage: Send + Sync {
    /// Registered type name of the engine (e.g. "memory")
    fn storage_type(&self) -> &str;

    /// Store `data` under `blob_ref`, overwriting nothing if already present
    fn receive(&self, blob_ref: &str, data: &[u8]) -> Result<()>;

    /// Fetch the blob stored under `blob_ref`
    fn fetch(&self, blob_ref: &str) -> Result<Option<Vec<u8>>>;

    /// List every stored blob reference in ascending order
    fn enumerate(&self) -> Result<Vec<String>>;

    /// Whether `blob_ref` is present
    fn contains(&self, blob_ref: &str) -> Result<bool> {
        Ok(self.fetch(blob_ref)?.is_some())
    }
}
