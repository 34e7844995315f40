//! Application ports
//!
//! - [`loader`] - the contract constructors use to resolve their dependencies
//! - [`registry`] - the type name to constructor tables

pub mod loader;
pub mod registry;

pub use loader::{FindHandlerByType, FoundHandler, Loader};
