//! Replicating storage engine
//!
//! Fans every write out to a list of other configured storage prefixes and
//! reads from the first one that has the blob. The backends are resolved
//! through the loader while this engine is constructed, which is what
//! makes the replica a dependent of its backends.
//!
//! ## Example
//!
//! ```ignore
//! [prefixes."/r/"]
//! handler = "storage-replica"
//! handler_args = { backends = ["/bs1/", "/bs2/"], min_write_replicas = 1 }
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use blobsrv_application::ports::Loader;
use blobsrv_domain::error::{Error, Result};
use blobsrv_domain::ports::Storage;
use blobsrv_domain::value_objects::ConfigObj;
use tracing::{debug, warn};

/// Replicating storage engine
pub struct ReplicaStorage {
    backends: Vec<(String, Arc<dyn Storage>)>,
    min_writes: usize,
}

impl ReplicaStorage {
    /// Replicate across `backends`, requiring `min_writes` successful writes
    pub fn new(backends: Vec<(String, Arc<dyn Storage>)>, min_writes: usize) -> Result<Self> {
        if backends.is_empty() {
            return Err(Error::config("replica storage needs at least one backend"));
        }
        if min_writes == 0 || min_writes > backends.len() {
            return Err(Error::config(format!(
                "min_write_replicas must be between 1 and {}, got {min_writes}",
                backends.len()
            )));
        }
        Ok(Self {
            backends,
            min_writes,
        })
    }

    /// Build from handler arguments, loading each backend prefix.
    ///
    /// `backends` is required; `min_write_replicas` defaults to all of them.
    pub fn from_loader(loader: &dyn Loader, config: &ConfigObj) -> Result<Self> {
        let mut args = config.reader();
        let prefixes = args.required_string_list("backends")?;
        let min_writes = args.optional_int("min_write_replicas", prefixes.len() as i64)?;
        args.validate()?;

        let min_writes = usize::try_from(min_writes).map_err(|_| {
            Error::config(format!("min_write_replicas must be positive, got {min_writes}"))
        })?;
        let mut backends = Vec::with_capacity(prefixes.len());
        for prefix in prefixes {
            let storage = loader.get_storage(&prefix)?;
            debug!(replica = loader.my_prefix(), backend = %prefix, "replica backend loaded");
            backends.push((prefix, storage));
        }
        Self::new(backends, min_writes)
    }

    /// Prefixes of the backends, in configured order
    pub fn backend_prefixes(&self) -> Vec<&str> {
        self.backends.iter().map(|(prefix, _)| prefix.as_str()).collect()
    }

    /// Successful writes required for `receive` to succeed
    pub fn min_writes(&self) -> usize {
        self.min_writes
    }
}

impl Storage for ReplicaStorage {
    fn storage_type(&self) -> &str {
        "replica"
    }

    fn receive(&self, blob_ref: &str, data: &[u8]) -> Result<()> {
        let mut written = 0;
        let mut last_error = None;
        for (prefix, backend) in &self.backends {
            match backend.receive(blob_ref, data) {
                Ok(()) => written += 1,
                Err(err) => {
                    warn!(backend = %prefix, blob_ref, error = %err, "replica write failed");
                    last_error = Some(err);
                }
            }
        }
        if written >= self.min_writes {
            return Ok(());
        }
        let cause = last_error.map(|err| err.to_string()).unwrap_or_default();
        Err(Error::io(format!(
            "blob {blob_ref} written to {written} of {} replicas, {} required: {cause}",
            self.backends.len(),
            self.min_writes
        )))
    }

    fn fetch(&self, blob_ref: &str) -> Result<Option<Vec<u8>>> {
        let mut last_error = None;
        for (prefix, backend) in &self.backends {
            match backend.fetch(blob_ref) {
                Ok(Some(data)) => return Ok(Some(data)),
                Ok(None) => {}
                Err(err) => {
                    warn!(backend = %prefix, blob_ref, error = %err, "replica read failed");
                    last_error = Some(err);
                }
            }
        }
        match last_error {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    fn enumerate(&self) -> Result<Vec<String>> {
        let mut refs = BTreeSet::new();
        for (_, backend) in &self.backends {
            refs.extend(backend.enumerate()?);
        }
        Ok(refs.into_iter().collect())
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use blobsrv_application::ports::registry::{STORAGE_CONSTRUCTORS, StorageConstructorEntry};

#[linkme::distributed_slice(STORAGE_CONSTRUCTORS)]
static REPLICA_STORAGE: StorageConstructorEntry = StorageConstructorEntry {
    name: "replica",
    description: "Replicates blobs across other configured storage prefixes",
    constructor: |loader: &dyn Loader, config: &ConfigObj| {
        Ok(Arc::new(ReplicaStorage::from_loader(loader, config)?))
    },
};
