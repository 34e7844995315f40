//! Storage synchronisation handler
//!
//! Copies every blob present in the `from` storage and missing from the
//! `to` storage. `GET` reports progress, `POST` runs one pass.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use blobsrv_application::ports::Loader;
use blobsrv_domain::error::Result;
use blobsrv_domain::ports::{Handler, Storage};
use blobsrv_domain::value_objects::{ConfigObj, HandlerResponse, RequestContext};
use serde::Serialize;
use tracing::{debug, info};

use crate::utils::method_not_allowed;

/// Progress report served on `GET`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// Source storage prefix
    pub from: String,
    /// Destination storage prefix
    pub to: String,
    /// Completed passes
    pub passes: u64,
    /// Blobs copied across all passes
    pub blobs_copied: u64,
}

/// Storage synchronisation handler
pub struct SyncHandler {
    from_prefix: String,
    to_prefix: String,
    from: Arc<dyn Storage>,
    to: Arc<dyn Storage>,
    passes: AtomicU64,
    blobs_copied: AtomicU64,
    // One pass at a time
    running: Mutex<()>,
}

impl SyncHandler {
    /// Synchronise `from` into `to`
    pub fn new(
        from_prefix: impl Into<String>,
        from: Arc<dyn Storage>,
        to_prefix: impl Into<String>,
        to: Arc<dyn Storage>,
    ) -> Self {
        Self {
            from_prefix: from_prefix.into(),
            to_prefix: to_prefix.into(),
            from,
            to,
            passes: AtomicU64::new(0),
            blobs_copied: AtomicU64::new(0),
            running: Mutex::new(()),
        }
    }

    /// Build from handler arguments, loading both storage prefixes.
    ///
    /// `from` and `to` are required.
    pub fn from_loader(loader: &dyn Loader, config: &ConfigObj) -> Result<Self> {
        let mut args = config.reader();
        let from_prefix = args.required_string("from")?;
        let to_prefix = args.required_string("to")?;
        args.validate()?;

        let from = loader.get_storage(&from_prefix)?;
        let to = loader.get_storage(&to_prefix)?;
        Ok(Self::new(from_prefix, from, to_prefix, to))
    }

    /// Copy every blob missing from the destination. Returns the number copied.
    pub fn run_once(&self) -> Result<usize> {
        let _running = self.running.lock().unwrap_or_else(PoisonError::into_inner);

        let mut copied = 0;
        for blob_ref in self.from.enumerate()? {
            if self.to.contains(&blob_ref)? {
                continue;
            }
            // Enumerated blobs can vanish before they are fetched
            let Some(data) = self.from.fetch(&blob_ref)? else {
                debug!(blob_ref = %blob_ref, "blob disappeared during sync");
                continue;
            };
            self.to.receive(&blob_ref, &data)?;
            copied += 1;
        }

        self.passes.fetch_add(1, Ordering::Relaxed);
        self.blobs_copied
            .fetch_add(copied as u64, Ordering::Relaxed);
        info!(from = %self.from_prefix, to = %self.to_prefix, copied, "sync pass complete");
        Ok(copied)
    }

    /// Current progress
    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            from: self.from_prefix.clone(),
            to: self.to_prefix.clone(),
            passes: self.passes.load(Ordering::Relaxed),
            blobs_copied: self.blobs_copied.load(Ordering::Relaxed),
        }
    }
}

impl Handler for SyncHandler {
    fn handler_type(&self) -> &str {
        "sync"
    }

    fn serve(&self, request: &RequestContext) -> Result<HandlerResponse> {
        match request.method.as_str() {
            "GET" => HandlerResponse::json(&self.status()),
            "POST" => {
                let copied = self.run_once()?;
                HandlerResponse::json(&serde_json::json!({ "copied": copied }))
            }
            _ => Ok(method_not_allowed(request, &["GET", "POST"])),
        }
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

use blobsrv_application::ports::registry::{HANDLER_CONSTRUCTORS, HandlerConstructorEntry};

#[linkme::distributed_slice(HANDLER_CONSTRUCTORS)]
static SYNC_HANDLER: HandlerConstructorEntry = HandlerConstructorEntry {
    name: "sync",
    description: "Copies blobs missing from one storage prefix into another",
    constructor: |loader: &dyn Loader, config: &ConfigObj| {
        Ok(Arc::new(SyncHandler::from_loader(loader, config)?))
    },
};
