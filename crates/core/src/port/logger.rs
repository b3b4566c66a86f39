// Logger Port (injectable log sink for supervised servers)

use crate::error::ServerErrorResponse;
use tracing::{debug, error, info, warn};

/// Severity-leveled log sink
///
/// Supervision itself only emits `debug` (service registration) and `error`
/// (call failures).
#[cfg_attr(test, mockall::automock)]
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, error: &ServerErrorResponse, message: &str);
}

/// Logger that forwards to `tracing` (production)
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        debug!("{}", message);
    }

    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    fn error(&self, err: &ServerErrorResponse, message: &str) {
        let details = serde_json::Value::Object(err.details.clone());
        error!(
            code = err.status_code(),
            error.message = %err.message,
            error.details = %details,
            "{}",
            message
        );
    }
}
