//! Value objects shared across layers

pub mod config_obj;
pub mod instance;
pub mod request;

pub use config_obj::{ConfigObj, ConfigReader};
pub use instance::{ConstructorKind, HandlerInstance};
pub use request::{HandlerResponse, RequestContext};
