// Demo echo service: one method per completion style

use serde_json::{json, Value};
use std::time::Duration;
use supervised_core::{
    handler, status, MethodDescriptor, MethodMap, ServerErrorResponse, ServiceDescriptor,
};

pub const SERVICE_NAME: &str = "echo.v1";

pub fn descriptor() -> ServiceDescriptor {
    ServiceDescriptor::new(SERVICE_NAME)
        .with_method(MethodDescriptor::new("say").with_types("Any", "Any"))
        .with_method(MethodDescriptor::new("reverse").with_types("ReverseRequest", "String"))
        .with_method(MethodDescriptor::new("fail").with_types("Any", "Never"))
}

fn reverse_text(params: &Value) -> Result<String, ServerErrorResponse> {
    params
        .get("text")
        .and_then(Value::as_str)
        .map(|text| text.chars().rev().collect())
        .ok_or_else(|| {
            ServerErrorResponse::new("`text` must be a string")
                .with_code(status::INVALID_ARGUMENT)
                .with_detail("field", "text")
        })
}

pub fn implementation() -> MethodMap {
    let mut methods = MethodMap::new();

    // Synchronous: replies before returning
    methods.insert(
        "say".to_string(),
        handler::sync(|call, callback| {
            callback.success(call.params);
            Ok(())
        }),
    );

    // Asynchronous: replies (or signals a failure) after a suspension point
    methods.insert(
        "reverse".to_string(),
        handler::from_fn(|call, callback| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            match reverse_text(&call.params) {
                Ok(reversed) => callback.success(json!(reversed)),
                Err(e) => callback.failure(e),
            }
            Ok(())
        }),
    );

    // Raises instead of replying
    methods.insert(
        "fail".to_string(),
        handler::from_fn(|call, _callback| async move {
            let reason = call
                .params
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("requested failure");
            Err(ServerErrorResponse::new(reason).into())
        }),
    );

    methods
}

/// Hide internal failure messages from clients
pub fn redact_internal(err: &ServerErrorResponse) -> ServerErrorResponse {
    if err.status_code() == status::INTERNAL {
        ServerErrorResponse::new("internal server error").with_code(status::INTERNAL)
    } else {
        err.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supervised_core::{Call, Callback, Handler};

    #[test]
    fn test_descriptor_declares_every_implemented_method() {
        let descriptor = descriptor();
        for name in implementation().keys() {
            assert!(descriptor.method(name).is_some(), "{name} not declared");
        }
    }

    #[test]
    fn test_reverse_text() {
        assert_eq!(reverse_text(&json!({"text": "abc"})).unwrap(), "cba");

        let err = reverse_text(&json!({"text": 1})).unwrap_err();
        assert_eq!(err.code, Some(status::INVALID_ARGUMENT));
    }

    #[test]
    fn test_redact_internal() {
        let internal = ServerErrorResponse::new("db password rejected").with_code(status::INTERNAL);
        assert_eq!(redact_internal(&internal).message, "internal server error");

        let invalid = ServerErrorResponse::new("bad input").with_code(status::INVALID_ARGUMENT);
        assert_eq!(redact_internal(&invalid), invalid);
    }

    #[tokio::test]
    async fn test_reverse_handler_replies_through_callback() {
        let methods = implementation();
        let (callback, rx) = Callback::channel();

        methods["reverse"]
            .call(Call::new(SERVICE_NAME, "reverse", json!({"text": "stressed"})), callback)
            .await
            .unwrap();

        assert_eq!(rx.await.unwrap().into_result().unwrap(), json!("desserts"));
    }

    #[test]
    fn test_fail_handler_raises() {
        let methods = implementation();
        let (callback, _rx) = Callback::channel();

        let call = Call::new(SERVICE_NAME, "fail", json!({"reason": "nope"}));

        let outcome = tokio_test::block_on(methods["fail"].call(call, callback));

        assert_eq!(outcome.unwrap_err().to_string(), "nope");
    }
}
