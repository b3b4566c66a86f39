// Port Layer - Interfaces for external collaborators

pub mod base_server;
pub mod handler;
pub mod logger;

// Re-exports
pub use base_server::BaseServer;
pub use handler::{Handler, HandlerFuture, MethodMap};
pub use logger::{Logger, TracingLogger};
