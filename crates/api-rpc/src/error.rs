//! RPC Error Types
//!
//! Maps supervised call failures onto JSON-RPC error objects. Status codes
//! travel unchanged as the JSON-RPC error code.

use jsonrpsee::types::ErrorObjectOwned;
use serde_json::Value;
use supervised_core::{status, ServerErrorResponse};
use thiserror::Error;

/// JSON-RPC server errors
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Failed to build server on {addr}: {source}")]
    Build {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register method: {0}")]
    Register(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a call failure to a JSON-RPC ErrorObject
///
/// Extra attributes become the error `data`; it is omitted when there are
/// none.
pub fn to_rpc_error(err: &ServerErrorResponse) -> ErrorObjectOwned {
    let data = (!err.details.is_empty()).then(|| Value::Object(err.details.clone()));
    ErrorObjectOwned::owned(err.status_code(), err.message.clone(), data)
}

/// Error for a method the schema declares but no handler implements
pub fn unimplemented_error(method: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        status::UNIMPLEMENTED,
        format!("The server does not implement the method {}", method),
        None::<()>,
    )
}
