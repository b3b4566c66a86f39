// Application Layer - Supervision Policy

pub(crate) mod panic_guard;
pub mod server;
pub mod supervisor;

pub use server::{ServerOptions, SupervisedServer};
pub use supervisor::{
    ErrorFormatter, ProxyMap, SupervisoryProxy, ABANDONED_CALLBACK_MESSAGE, CALL_FAILED_MESSAGE,
};
