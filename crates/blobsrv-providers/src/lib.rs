//! # blobsrv - Storage Engines and HTTP Handlers
//!
//! Every user-selectable engine and handler lives here. Each one submits a
//! constructor to the distributed slices of `blobsrv-application`, so
//! linking this crate is all it takes to make its types available to the
//! handler loader.
//!
//! ## Provided Types
//!
//! | Kind | Type name | Implementation |
//! |------|-----------|----------------|
//! | Storage | `memory` | [`storage::MemoryStorage`] |
//! | Storage | `filesystem` | [`storage::FilesystemStorage`] |
//! | Storage | `replica` | [`storage::ReplicaStorage`] |
//! | Handler | `root` | [`handlers::RootHandler`] |
//! | Handler | `sync` | [`handlers::SyncHandler`] |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! blobsrv-providers = { version = "0.1", default-features = false, features = ["storage-memory"] }
//! ```
//!
//! Binaries that never name a provider type directly still need
//! `extern crate blobsrv_providers;` so the linker keeps the registrations.

pub use blobsrv_domain::error::{Error, Result};
pub use blobsrv_domain::ports::{Handler, Storage};

/// Provider-specific constants
pub mod constants;

/// Shared helpers for provider implementations
pub mod utils;

/// Storage engine implementations
pub mod storage;

/// HTTP handler implementations
pub mod handlers;
