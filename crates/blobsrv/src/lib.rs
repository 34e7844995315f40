//! # blobsrv
//!
//! A blob server assembled at startup from configuration. Each configured
//! URL prefix names a storage engine or HTTP handler type together with
//! its arguments; the handler loader constructs every prefix once,
//! resolving the dependencies constructors ask for along the way.
//!
//! ## Example
//!
//! ```ignore
//! let (config, loaded) = blobsrv::load(Some(Path::new("blobsrv.toml")))?;
//! for line in blobsrv::describe_loaded(&loaded) {
//!     println!("{line}");
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - capability ports, instances, request values and errors
//! - `application` - the loader contract and the constructor registry
//! - `infrastructure` - configuration, logging and the handler loader
//! - `providers` - the storage engines and handlers themselves

// Force-link blobsrv-providers so its linkme registrations are kept
extern crate blobsrv_providers;

/// Domain layer - capability ports and value objects
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use blobsrv_domain::*;
}

/// Application layer - loader contract and constructor registry
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use blobsrv_application::*;
}

/// Infrastructure layer - configuration, logging and handler loading
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use blobsrv_infrastructure::*;
}

/// Storage engines and handlers
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use blobsrv_providers::*;
}

mod run;

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export entry points at the crate root
pub use run::{describe_loaded, describe_types, load, run};
