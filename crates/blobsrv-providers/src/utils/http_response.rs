//! HTTP response helpers shared by handlers

use blobsrv_domain::value_objects::{HandlerResponse, RequestContext};

/// 405 response naming the methods a handler does accept
pub fn method_not_allowed(request: &RequestContext, allowed: &[&str]) -> HandlerResponse {
    HandlerResponse::text(
        405,
        format!(
            "method {} not allowed, expected one of: {}",
            request.method,
            allowed.join(", ")
        ),
    )
}
