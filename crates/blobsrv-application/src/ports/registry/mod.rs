//! Constructor Registry System
//!
//! Maps a configured type name to the code that builds it. Engines and
//! handlers announce themselves through `linkme` distributed slices; the
//! process-wide [`ConstructorRegistry`] copies every linked entry on first
//! access and also accepts explicit registration at startup.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Constructor Registration Flow                 │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  1. Engine defines:  #[linkme::distributed_slice(               │
//! │                          STORAGE_CONSTRUCTORS)]                 │
//! │                      static ENTRY: StorageConstructorEntry      │
//! │                              ↓                                  │
//! │  2. First access:    ConstructorRegistry::global()              │
//! │                      copies every slice entry, once             │
//! │                              ↓                                  │
//! │  3. Loader asks:     create_instance("storage-memory", ..)      │
//! │                              ↓                                  │
//! │  4. Constructor runs with the loader, lock released             │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Registering a storage engine (in blobsrv-providers)
//!
//! ```ignore
//! use blobsrv_application::ports::registry::{StorageConstructorEntry, STORAGE_CONSTRUCTORS};
//!
//! #[linkme::distributed_slice(STORAGE_CONSTRUCTORS)]
//! static MEMORY_STORAGE: StorageConstructorEntry = StorageConstructorEntry {
//!     name: "memory",
//!     description: "In-memory blob storage",
//!     constructor: |_loader, _config| Ok(Arc::new(MemoryStorage::new())),
//! };
//! ```
//!
//! ### Registering at startup
//!
//! ```ignore
//! blobsrv_application::ports::registry::register_handler_constructor("status", |loader, config| {
//!     Ok(Arc::new(StatusHandler::new(loader.my_prefix())))
//! });
//! ```
//!
//! Registering the same type name twice in one table panics: it can only
//! happen through a packaging mistake and must never silently change
//! which implementation serves a configured type.

pub mod constructors;
pub mod handler;
pub mod storage;

pub use constructors::{
    ConstructorRegistry, HandlerConstructor, StorageConstructor, create_handler, create_storage,
    register_handler_constructor, register_storage_constructor,
};
pub use handler::{HANDLER_CONSTRUCTORS, HandlerConstructorEntry, HandlerConstructorFn};
pub use storage::{STORAGE_CONSTRUCTORS, StorageConstructorEntry, StorageConstructorFn};
