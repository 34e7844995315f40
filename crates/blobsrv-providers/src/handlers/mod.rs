//! HTTP Handler Implementations
//!
//! | Handler | Type name | Description |
//! |---------|-----------|-------------|
//! | [`RootHandler`] | `root` | Discovery document describing the server |
//! | [`SyncHandler`] | `sync` | Copies blobs between two storage prefixes |

#[cfg(feature = "handler-root")]
pub mod root;
#[cfg(feature = "handler-sync")]
pub mod sync;

#[cfg(feature = "handler-root")]
pub use root::RootHandler;
#[cfg(feature = "handler-sync")]
pub use sync::SyncHandler;
