//! JSON-RPC API Layer
//!
//! Binds the supervised server onto jsonrpsee: each supervised method is
//! served as a JSON-RPC 2.0 method over HTTP/WebSocket.

pub mod error;
pub mod handler;
pub mod server;

pub use error::RpcError;
pub use server::{JsonRpcServer, RpcServerConfig, SupervisedRpcServer};
