//! # blobsrv application layer
//!
//! Defines how pluggable storage engines and HTTP handlers announce
//! themselves ([`ports::registry`]) and the [`ports::loader::Loader`]
//! contract their constructors receive while a configuration is loaded.

pub mod ports;

pub use ports::registry::ConstructorRegistry;
pub use ports::{FindHandlerByType, FoundHandler, Loader};
