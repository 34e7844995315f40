//! Loader Port
//!
//! The contract a constructor sees while it builds an instance. Through it
//! a constructor learns its own prefix, peeks at sibling types, forces the
//! construction of its dependencies and finds siblings by role.

use std::sync::Arc;

use blobsrv_domain::error::Result;
use blobsrv_domain::ports::{Handler, Storage};
use blobsrv_domain::value_objects::{HandlerInstance, RequestContext};

/// Result of [`FindHandlerByType::find_handler_by_type`]
#[derive(Debug, Clone)]
pub struct FoundHandler {
    /// Prefix declaring the requested type
    pub prefix: String,
    /// The instance, once it has been constructed
    pub instance: Option<HandlerInstance>,
}

/// Finds a sibling handler by its declared type
pub trait FindHandlerByType {
    /// Find the prefix declaring `handler_type`, and its instance if built.
    ///
    /// Unlike [`Loader::get_handler`] this never forces construction. Called
    /// while handlers are still being constructed it may return the prefix
    /// with no instance. Once every handler is constructed both are present.
    /// When several prefixes declare the type, the smallest prefix wins.
    fn find_handler_by_type(&self, handler_type: &str) -> Result<FoundHandler>;
}

/// Resolves named handler instances for constructors
pub trait Loader: FindHandlerByType + Send + Sync {
    /// Prefix of the handler currently being constructed on this path.
    /// Empty outside of any construction.
    fn my_prefix(&self) -> &str;

    /// Declared type of `prefix` without loading it. `None` if unknown.
    fn get_handler_type(&self, prefix: &str) -> Option<String>;

    /// Load `prefix` if needed and return its instance.
    ///
    /// Fails with a cycle error if `prefix` is already being constructed
    /// on the current path.
    fn get_handler(&self, prefix: &str) -> Result<HandlerInstance>;

    /// Like [`Loader::get_handler`] but requires the storage capability
    fn get_storage(&self, prefix: &str) -> Result<Arc<dyn Storage>> {
        self.get_handler(prefix)?.into_storage(prefix)
    }

    /// Like [`Loader::get_handler`] but requires the HTTP capability
    fn get_http_handler(&self, prefix: &str) -> Result<Arc<dyn Handler>> {
        self.get_handler(prefix)?.into_handler(prefix)
    }

    /// The inbound request that triggered this configuration load, if any
    fn request_context(&self) -> Option<&RequestContext>;
}
