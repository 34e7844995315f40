//! # blobsrv domain
//!
//! Core types shared by every blobsrv layer:
//!
//! - [`ports`] - the `Storage` and `Handler` capabilities a constructor can produce
//! - [`value_objects`] - handler instances, opaque handler configuration, requests
//! - [`error`] - the error taxonomy used throughout the workspace

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{Handler, Storage};
pub use value_objects::{ConfigObj, ConstructorKind, HandlerInstance, RequestContext};
