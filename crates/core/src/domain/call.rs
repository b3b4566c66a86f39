//! Call context and completion callbacks
//!
//! A handler receives a [`Call`] and a [`Callback`]. The callback is an owned
//! `FnOnce`, so a handler can complete a call at most once.

use crate::error::ServerErrorResponse;
use serde_json::Value;
use std::fmt;
use tokio::sync::oneshot;

/// Incoming call as seen by a handler
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub service: String,
    pub method: String,
    /// Request params (`Value::Null` when the client sent none)
    pub params: Value,
}

impl Call {
    pub fn new(service: impl Into<String>, method: impl Into<String>, params: Value) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            params,
        }
    }
}

/// Arguments a callback was completed with
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub error: Option<ServerErrorResponse>,
    pub result: Option<Value>,
}

impl Completion {
    /// Collapse into a result; a missing payload on success becomes `Null`
    pub fn into_result(self) -> Result<Value, ServerErrorResponse> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

type CompleteFn = Box<dyn FnOnce(Option<ServerErrorResponse>, Option<Value>) + Send>;

/// Completion callback: `(error, result)`
pub struct Callback {
    complete: CompleteFn,
}

impl Callback {
    pub fn new<F>(complete: F) -> Self
    where
        F: FnOnce(Option<ServerErrorResponse>, Option<Value>) + Send + 'static,
    {
        Self {
            complete: Box::new(complete),
        }
    }

    /// Callback that delivers its completion through a oneshot channel
    ///
    /// The receiver resolves to `Err(RecvError)` if the callback is dropped
    /// without being invoked.
    pub fn channel() -> (Self, oneshot::Receiver<Completion>) {
        let (tx, rx) = oneshot::channel();
        let callback = Self::new(move |error, result| {
            // Receiver gone means the caller stopped waiting
            let _ = tx.send(Completion { error, result });
        });
        (callback, rx)
    }

    pub fn complete(self, error: Option<ServerErrorResponse>, result: Option<Value>) {
        (self.complete)(error, result)
    }

    pub fn success(self, result: Value) {
        self.complete(None, Some(result))
    }

    pub fn failure(self, error: ServerErrorResponse) {
        self.complete(Some(error), None)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}
