// Supervised Core - Call Supervision & Ports
// NO transport dependencies (hexagonal architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{
    ErrorFormatter, ServerOptions, SupervisedServer, SupervisoryProxy, ABANDONED_CALLBACK_MESSAGE,
    CALL_FAILED_MESSAGE,
};
pub use domain::{Call, Callback, Completion, MethodDescriptor, ServiceDescriptor};
pub use error::{status, BoxError, ServerErrorResponse};
pub use port::handler;
pub use port::{BaseServer, Handler, Logger, MethodMap, TracingLogger};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
