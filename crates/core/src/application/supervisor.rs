//! Supervisory Proxy
//!
//! Every registered handler is replaced by a [`SupervisoryProxy`]. The proxy
//! hands the handler a wrapped callback, awaits its future under panic
//! isolation and funnels every failure, however it surfaces, into a single
//! log-then-format path before completing the caller's callback.

use crate::application::panic_guard;
use crate::domain::{Call, Callback};
use crate::error::{BoxError, ServerErrorResponse};
use crate::port::{Handler, HandlerFuture, Logger};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, debug_span, warn, Instrument};
use uuid::Uuid;

/// Message attached to every failure handed to [`Logger::error`]
pub const CALL_FAILED_MESSAGE: &str = "An error occurred while handling the RPC call";

/// Failure reported when a handler lets its callback go without invoking it
pub const ABANDONED_CALLBACK_MESSAGE: &str = "handler completed without invoking its callback";

/// Rewrites a failure into the shape surfaced to clients
pub type ErrorFormatter = Arc<dyn Fn(&ServerErrorResponse) -> ServerErrorResponse + Send + Sync>;

/// Method name -> proxy, as handed to the base server
pub type ProxyMap = BTreeMap<String, SupervisoryProxy>;

/// Immutable supervision config shared by every proxy of a server
#[derive(Clone, Default)]
pub(crate) struct Supervisor {
    pub(crate) format_error: Option<ErrorFormatter>,
    pub(crate) logger: Option<Arc<dyn Logger>>,
}

impl Supervisor {
    fn log_failure(&self, error: &ServerErrorResponse) {
        if let Some(logger) = &self.logger {
            logger.error(error, CALL_FAILED_MESSAGE);
        }
    }

    /// Failure signaled through the callback
    ///
    /// Logs the normalized copy and runs the formatter on the raw error. The
    /// caller still forwards the raw error; the formatted value is not
    /// substituted on this path.
    fn observe_signaled(&self, raw: &ServerErrorResponse) {
        self.log_failure(&raw.normalized());

        if let Some(format_error) = &self.format_error {
            let formatted = format_error(raw);
            debug!(code = formatted.status_code(), "Formatted callback failure");
        }
    }

    /// Failure raised by the handler: the returned value replaces it
    fn resolve_raised(&self, failure: &ServerErrorResponse) -> ServerErrorResponse {
        let normalized = failure.normalized();
        self.log_failure(&normalized);

        match &self.format_error {
            Some(format_error) => format_error(&normalized),
            None => normalized,
        }
    }

    /// Handler resolved and its callback went away uninvoked
    fn abandon(&self, callback: Callback) {
        let response = self.resolve_raised(&ServerErrorResponse::new(ABANDONED_CALLBACK_MESSAGE));
        callback.failure(response);
    }
}

/// Per-call holder of the caller's callback
///
/// Whoever takes the callback first (wrapped callback, raised failure or
/// abandonment) completes the call. Abandonment needs both the handler's
/// future settled and the wrapped callback released; both flags live under
/// the same lock as the callback, so exactly one side sees the pair.
struct ReplySlot {
    state: Mutex<SlotState>,
}

struct SlotState {
    callback: Option<Callback>,
    /// The handler's own future resolved without failing
    settled: bool,
    /// The wrapped callback was dropped
    released: bool,
}

impl ReplySlot {
    fn new(callback: Callback) -> Self {
        Self {
            state: Mutex::new(SlotState {
                callback: Some(callback),
                settled: false,
                released: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self) -> Option<Callback> {
        self.lock().callback.take()
    }

    /// Mark the handler's future as resolved; yields the callback if the
    /// wrapped one is already gone unused
    fn settle(&self) -> Option<Callback> {
        let mut state = self.lock();
        state.settled = true;
        if state.released {
            state.callback.take()
        } else {
            None
        }
    }

    /// Mark the wrapped callback as dropped; yields the callback if the
    /// handler's future already resolved
    fn release(&self) -> Option<Callback> {
        let mut state = self.lock();
        state.released = true;
        if state.settled {
            state.callback.take()
        } else {
            None
        }
    }
}

/// Callback substituted for the caller's one while the handler runs
struct WrappedCallback {
    slot: Arc<ReplySlot>,
    supervisor: Arc<Supervisor>,
}

impl WrappedCallback {
    fn into_callback(self) -> Callback {
        Callback::new(move |error, result| self.forward(error, result))
    }

    fn forward(&self, error: Option<ServerErrorResponse>, result: Option<Value>) {
        let Some(callback) = self.slot.take() else {
            warn!(
                failed = error.is_some(),
                "Callback invoked after the call was already completed"
            );
            return;
        };

        if let Some(raw) = &error {
            self.supervisor.observe_signaled(raw);
        }
        callback.complete(error, result);
    }
}

impl Drop for WrappedCallback {
    fn drop(&mut self) {
        // Dropped after being invoked: the slot is already empty
        if let Some(callback) = self.slot.release() {
            self.supervisor.abandon(callback);
        }
    }
}

/// Supervised stand-in for one registered handler
#[derive(Clone)]
pub struct SupervisoryProxy {
    handler: Arc<dyn Handler>,
    supervisor: Arc<Supervisor>,
}

impl SupervisoryProxy {
    pub(crate) fn new(handler: Arc<dyn Handler>, supervisor: Arc<Supervisor>) -> Self {
        Self {
            handler,
            supervisor,
        }
    }

    async fn supervise(&self, call: Call, callback: Callback) {
        let slot = Arc::new(ReplySlot::new(callback));
        let wrapped = WrappedCallback {
            slot: Arc::clone(&slot),
            supervisor: Arc::clone(&self.supervisor),
        }
        .into_callback();

        let outcome = panic_guard::guard(|| self.handler.call(call, wrapped)).await;

        match outcome {
            Ok(()) => {
                if let Some(callback) = slot.settle() {
                    self.supervisor.abandon(callback);
                }
            }
            Err(failure) => {
                match slot.take() {
                    Some(callback) => {
                        let response = self.supervisor.resolve_raised(&failure);
                        callback.failure(response);
                    }
                    None => warn!(
                        error = %failure,
                        "Handler failed after completing its callback; keeping the callback outcome"
                    ),
                }
            }
        }
    }
}

impl Handler for SupervisoryProxy {
    fn call(&self, call: Call, callback: Callback) -> HandlerFuture {
        let proxy = self.clone();
        let span = debug_span!(
            "supervised_call",
            call_id = %Uuid::new_v4(),
            service = %call.service,
            method = %call.method
        );
        Box::pin(
            async move {
                proxy.supervise(call, callback).await;
                Ok::<(), BoxError>(())
            }
            .instrument(span),
        )
    }
}
