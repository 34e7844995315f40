//! Handler Loader
//!
//! Resolves the prefixes declared in one configuration into live
//! instances. Constructors receive a [`ConstructionScope`] as their
//! `&dyn Loader`; any prefix they request through it is constructed
//! depth-first on the same call stack.
//!
//! ```text
//! get_handler("/ui/")
//!   └─ registry.create_instance("ui", scope("/ui/"), args)
//!        └─ scope.get_storage("/bs/")
//!             └─ registry.create_instance("storage-memory", scope("/bs/"), args)
//! ```
//!
//! Each scope knows the chain of constructors above it. Requesting a
//! prefix on that chain is a cycle and is rejected before its constructor
//! could be entered again. Requesting a prefix that another thread is
//! constructing blocks until that construction finishes, unless the other
//! construction is itself waiting on this chain; that is a cycle too.

mod handler_loader;
mod loaded;
mod scope;
mod state;

pub use handler_loader::HandlerLoader;
pub use loaded::LoadedHandlers;
pub use scope::ConstructionScope;
pub use state::InstanceStatus;
