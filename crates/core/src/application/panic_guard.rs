// Panic isolation for handler invocations

use crate::error::ServerErrorResponse;
use crate::port::HandlerFuture;
use futures::FutureExt;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn panicked(payload: Box<dyn Any + Send>) -> ServerErrorResponse {
    let panic_msg = panic_message(payload.as_ref());
    error!(panic_msg = %panic_msg, "Handler panicked");
    ServerErrorResponse::new(panic_msg).with_detail("panicked", true)
}

/// Invoke a handler and await its future with panic isolation
///
/// Panics raised while invoking the handler or while polling its future are
/// caught and returned as failures, the same way as an `Err` outcome.
pub(crate) async fn guard<F>(invoke: F) -> Result<(), ServerErrorResponse>
where
    F: FnOnce() -> HandlerFuture,
{
    let future = match catch_unwind(AssertUnwindSafe(invoke)) {
        Ok(future) => future,
        Err(payload) => return Err(panicked(payload)),
    };

    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ServerErrorResponse::from_error(e.as_ref())),
        Err(payload) => Err(panicked(payload)),
    }
}
