//! Storage Engine Implementations
//!
//! ## Available Engines
//!
//! | Engine | Type name | Description |
//! |--------|-----------|-------------|
//! | [`MemoryStorage`] | `memory` | Process-local map, lost on restart |
//! | [`FilesystemStorage`] | `filesystem` | One file per blob under a directory |
//! | [`ReplicaStorage`] | `replica` | Fans writes out to other configured engines |
//!
//! Engines are usually declared as `storage-<name>` so the type never
//! collides with an HTTP handler of the same name.

#[cfg(feature = "storage-filesystem")]
pub mod filesystem;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-replica")]
pub mod replica;

#[cfg(feature = "storage-filesystem")]
pub use filesystem::FilesystemStorage;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
#[cfg(feature = "storage-replica")]
pub use replica::ReplicaStorage;
