//! Shared helpers for provider implementations

pub mod blob_ref;
pub mod http_response;

pub use blob_ref::validate_blob_ref;
pub use http_response::method_not_allowed;
