// Normalized Error Shape for Supervised Calls

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Status codes (gRPC status taxonomy)
pub mod status {
    pub const OK: i32 = 0;
    pub const CANCELLED: i32 = 1;
    pub const UNKNOWN: i32 = 2;
    pub const INVALID_ARGUMENT: i32 = 3;
    pub const DEADLINE_EXCEEDED: i32 = 4;
    pub const NOT_FOUND: i32 = 5;
    pub const ALREADY_EXISTS: i32 = 6;
    pub const PERMISSION_DENIED: i32 = 7;
    pub const RESOURCE_EXHAUSTED: i32 = 8;
    pub const FAILED_PRECONDITION: i32 = 9;
    pub const ABORTED: i32 = 10;
    pub const OUT_OF_RANGE: i32 = 11;
    pub const UNIMPLEMENTED: i32 = 12;
    pub const INTERNAL: i32 = 13;
    pub const UNAVAILABLE: i32 = 14;
    pub const DATA_LOSS: i32 = 15;
    pub const UNAUTHENTICATED: i32 = 16;
}

/// Boxed error type returned by failing handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure surfaced to the RPC transport
///
/// Handlers signal failures with this shape and the supervisor normalizes
/// raised errors into it. Any attributes beyond `code` and `message` live in
/// `details` and serialize flat alongside them.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message}")]
pub struct ServerErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,

    #[serde(default)]
    pub message: String,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ServerErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Effective status code; unspecified codes report as internal
    pub fn status_code(&self) -> i32 {
        self.code.unwrap_or(status::INTERNAL)
    }

    /// Copy of this error with every attribute kept and the code forced to
    /// `status::INTERNAL`
    pub fn normalized(&self) -> Self {
        Self {
            code: Some(status::INTERNAL),
            ..self.clone()
        }
    }

    /// Capture an arbitrary handler error
    ///
    /// A `ServerErrorResponse` travelling inside the box keeps all of its
    /// attributes. Anything else contributes its display text, plus its
    /// source chain under `cause`.
    pub fn from_error(err: &(dyn std::error::Error + Send + Sync + 'static)) -> Self {
        if let Some(response) = err.downcast_ref::<ServerErrorResponse>() {
            return response.clone();
        }

        let mut response = Self::new(err.to_string());
        let causes: Vec<Value> = std::iter::successors(err.source(), |e| e.source())
            .map(|e| Value::String(e.to_string()))
            .collect();
        if !causes.is_empty() {
            response.details.insert("cause".to_string(), Value::Array(causes));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Error)]
    #[error("query failed")]
    struct QueryError {
        #[source]
        source: std::io::Error,
    }

    #[test]
    fn test_status_code_defaults_to_internal() {
        assert_eq!(ServerErrorResponse::new("boom").status_code(), status::INTERNAL);
        assert_eq!(
            ServerErrorResponse::new("boom")
                .with_code(status::NOT_FOUND)
                .status_code(),
            status::NOT_FOUND
        );
    }

    #[test]
    fn test_normalized_overrides_code_and_keeps_attributes() {
        let raw = ServerErrorResponse::new("boom")
            .with_code(status::PERMISSION_DENIED)
            .with_detail("user", "alice");

        let normalized = raw.normalized();

        assert_eq!(normalized.code, Some(status::INTERNAL));
        assert_eq!(normalized.message, "boom");
        assert_eq!(normalized.details.get("user"), Some(&json!("alice")));
        assert_eq!(raw.code, Some(status::PERMISSION_DENIED), "raw is untouched");
    }

    #[test]
    fn test_serializes_flat() {
        let err = ServerErrorResponse::new("boom")
            .with_code(7)
            .with_detail("field", "name");

        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"code": 7, "message": "boom", "field": "name"})
        );

        let parsed: ServerErrorResponse =
            serde_json::from_value(json!({"message": "boom", "retry": false})).unwrap();
        assert_eq!(parsed.code, None);
        assert_eq!(parsed.details.get("retry"), Some(&json!(false)));
    }

    #[test]
    fn test_from_error_keeps_server_error_attributes() {
        let boxed: BoxError = Box::new(ServerErrorResponse::new("denied").with_code(7));

        let captured = ServerErrorResponse::from_error(boxed.as_ref());

        assert_eq!(captured, ServerErrorResponse::new("denied").with_code(7));
    }

    #[test]
    fn test_from_error_records_source_chain() {
        let boxed: BoxError = Box::new(QueryError {
            source: std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out"),
        });

        let captured = ServerErrorResponse::from_error(boxed.as_ref());

        assert_eq!(captured.message, "query failed");
        assert_eq!(captured.code, None);
        assert_eq!(
            captured.details.get("cause"),
            Some(&json!(["socket timed out"]))
        );
    }
}
