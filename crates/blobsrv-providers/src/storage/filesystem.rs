//! Filesystem storage engine
//!
//! One file per blob below a configured directory. Writes go to a partial
//! file first and are renamed into place, so readers never observe a
//! half-written blob.
//!
//! ## Example
//!
//! ```ignore
//! [prefixes."/bs/"]
//! handler = "storage-filesystem"
//! handler_args = { path = "/var/lib/blobsrv/blobs" }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use blobsrv_application::ports::Loader;
use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::ports::Storage;
use blobsrv_domain::value_objects::ConfigObj;
use tracing::debug;

use crate::constants::{FILESYSTEM_BLOB_EXTENSION, FILESYSTEM_PARTIAL_EXTENSION};
use crate::utils::validate_blob_ref;

/// Filesystem storage engine
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    root: PathBuf,
}

impl FilesystemStorage {
    /// Open `root`, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::io_with_source(
                format!("Failed to create storage directory {}", root.display()),
                e,
            )
        })?;
        debug!(root = %root.display(), "opened filesystem storage");
        Ok(Self { root })
    }

    /// Build from handler arguments: `path` is required
    pub fn from_config(config: &ConfigObj) -> Result<Self> {
        let mut args = config.reader();
        let path = args.required_string("path")?;
        args.validate()?;
        Self::open(path)
    }

    /// Directory holding the blobs
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, blob_ref: &str) -> Result<PathBuf> {
        validate_blob_ref(blob_ref)?;
        Ok(self
            .root
            .join(format!("{blob_ref}.{FILESYSTEM_BLOB_EXTENSION}")))
    }
}

impl Storage for FilesystemStorage {
    fn storage_type(&self) -> &str {
        "filesystem"
    }

    fn receive(&self, blob_ref: &str, data: &[u8]) -> Result<()> {
        let path = self.blob_path(blob_ref)?;
        if path.exists() {
            return Ok(());
        }
        let partial = path.with_extension(FILESYSTEM_PARTIAL_EXTENSION);
        fs::write(&partial, data).map_err(|e| {
            Error::io_with_source(format!("Failed to write blob {blob_ref}"), e)
        })?;
        fs::rename(&partial, &path).map_err(|e| {
            Error::io_with_source(format!("Failed to commit blob {blob_ref}"), e)
        })
    }

    fn fetch(&self, blob_ref: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(blob_ref)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io_with_source(
                format!("Failed to read blob {blob_ref}"),
                e,
            )),
        }
    }

    fn enumerate(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            Error::io_with_source(
                format!("Failed to list storage directory {}", self.root.display()),
                e,
            )
        })?;

        let mut refs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_blob = path
                .extension()
                .is_some_and(|ext| ext == FILESYSTEM_BLOB_EXTENSION);
            if !is_blob {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                refs.push(stem.to_string());
            }
        }
        refs.sort();
        Ok(refs)
    }

    fn contains(&self, blob_ref: &str) -> Result<bool> {
        Ok(self.blob_path(blob_ref)?.exists())
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use blobsrv_application::ports::registry::{STORAGE_CONSTRUCTORS, StorageConstructorEntry};

#[linkme::distributed_slice(STORAGE_CONSTRUCTORS)]
static FILESYSTEM_STORAGE: StorageConstructorEntry = StorageConstructorEntry {
    name: "filesystem",
    description: "One file per blob below a local directory",
    constructor: |_loader: &dyn Loader, config: &ConfigObj| {
        Ok(Arc::new(FilesystemStorage::from_config(config)?))
    },
};
