//! HTTP Handler Port

use crate::error::Result;
use crate::value_objects::{HandlerResponse, RequestContext};

/// An object capable of serving HTTP requests below its configured prefix
pub trait Handler: Send + Sync {
    /// Registered type name of the handler (e.g. "sync")
    fn handler_type(&self) -> &str;

    /// Serve one request
    fn serve(&self, request: &RequestContext) -> Result<HandlerResponse>;
}
