//! Handler Constructor Registry
//!
//! Auto-registration slice for HTTP handlers, mirroring
//! [`super::storage`].

use std::sync::Arc;

use blobsrv_domain::error::Result;
use blobsrv_domain::ports::Handler;
use blobsrv_domain::value_objects::ConfigObj;

use crate::ports::loader::Loader;

/// Constructor function for an HTTP handler
pub type HandlerConstructorFn = fn(&dyn Loader, &ConfigObj) -> Result<Arc<dyn Handler>>;

/// Registry entry for HTTP handlers
pub struct HandlerConstructorEntry {
    /// Unique type name (e.g., "root", "sync")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Builds an instance from its configuration
    pub constructor: HandlerConstructorFn,
}

#[linkme::distributed_slice]
pub static HANDLER_CONSTRUCTORS: [HandlerConstructorEntry] = [..];
