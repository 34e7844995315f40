//! Capability ports
//!
//! The two capabilities a registered constructor can produce. They share
//! no common supertrait; [`crate::value_objects::HandlerInstance`] carries
//! one or the other.

pub mod handler;
pub mod storage;

pub use handler::Handler;
pub use storage::Storage;
