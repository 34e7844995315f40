//! The loader view handed to a running constructor

use blobsrv_application::ports::{FindHandlerByType, FoundHandler, Loader};
use blobsrv_domain::error::Result;
use blobsrv_domain::value_objects::{HandlerInstance, RequestContext};

use super::HandlerLoader;

/// A [`Loader`] bound to the prefix whose constructor is running.
///
/// The scope remembers the chain of constructors that led here, so a
/// request for a prefix already on that chain is reported as a cycle while
/// a prefix some other thread is building is simply waited for. A scope is
/// `Sync`; a constructor may share it with threads it spawns.
pub struct ConstructionScope<'a> {
    loader: &'a HandlerLoader,
    // Outermost first, ends with this scope's own prefix
    path: Vec<String>,
}

impl<'a> ConstructionScope<'a> {
    pub(crate) fn new(loader: &'a HandlerLoader, path: Vec<String>) -> Self {
        Self { loader, path }
    }
}

impl FindHandlerByType for ConstructionScope<'_> {
    fn find_handler_by_type(&self, handler_type: &str) -> Result<FoundHandler> {
        self.loader.find_handler_by_type(handler_type)
    }
}

impl Loader for ConstructionScope<'_> {
    fn my_prefix(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    fn get_handler_type(&self, prefix: &str) -> Option<String> {
        self.loader.get_handler_type(prefix)
    }

    fn get_handler(&self, prefix: &str) -> Result<HandlerInstance> {
        self.loader.resolve(prefix, &self.path)
    }

    fn request_context(&self) -> Option<&RequestContext> {
        self.loader.request_context()
    }
}
