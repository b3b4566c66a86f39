//! RPC Method Dispatch
//!
//! Bridges a jsonrpsee method call onto the handler calling convention: the
//! top-level callback is backed by a oneshot channel whose completion becomes
//! the JSON-RPC response.

use crate::error::to_rpc_error;
use jsonrpsee::types::{ErrorObjectOwned, Params};
use serde_json::Value;
use supervised_core::{status, Call, Callback, Handler, ServerErrorResponse};
use tracing::warn;

const NO_RESPONSE_MESSAGE: &str = "call completed without a response";

/// Build the call context from raw JSON-RPC params
pub(crate) fn to_call(
    service: &str,
    method: &str,
    params: &Params<'_>,
) -> Result<Call, ErrorObjectOwned> {
    let params: Option<Value> = params.parse()?;
    Ok(Call::new(service, method, params.unwrap_or(Value::Null)))
}

/// Run one call through a handler and collect its completion
pub(crate) async fn dispatch(handler: &dyn Handler, call: Call) -> Result<Value, ErrorObjectOwned> {
    let (callback, completion) = Callback::channel();

    if let Err(e) = handler.call(call, callback).await {
        return Err(to_rpc_error(&ServerErrorResponse::from_error(e.as_ref())));
    }

    match completion.await {
        Ok(completion) => completion.into_result().map_err(|e| to_rpc_error(&e)),
        Err(_) => {
            warn!("Callback dropped without completing the call");
            Err(to_rpc_error(
                &ServerErrorResponse::new(NO_RESPONSE_MESSAGE).with_code(status::INTERNAL),
            ))
        }
    }
}
