//! JSON-RPC 2.0 envelope
//!
//! Parses single and batch requests, hands each call to an endpoint
//! dispatcher and maps service errors onto RPC error objects.

use std::future::Future;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::services::ServiceError;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const NOT_FOUND: i64 = 404;
pub const VALIDATION_FAILED: i64 = 400;
pub const INTERNAL_ERROR: i64 = 500;

/// One call as sent by the client.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    /// Absent for notifications. An explicit `null` is still a call.
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
}

/// Any value that is present, `null` included, is `Some`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => Self::new(NOT_FOUND, "Not found"),
            ServiceError::Validation(fields) => Self {
                code: VALIDATION_FAILED,
                message: "Validation failed".into(),
                data: serde_json::to_value(fields).ok(),
            },
            ServiceError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                Self::new(INTERNAL_ERROR, "Internal error")
            }
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(INTERNAL_ERROR, format!("Failed to encode result: {}", err))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

impl RpcResponse {
    fn new(id: Value, outcome: Result<Value, RpcError>) -> Self {
        let (result, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            jsonrpc: "2.0".into(),
            result,
            error,
            id,
        }
    }
}

/// Decode named params. Missing params decode as an empty object so that
/// methods whose params are all optional accept a bare call.
pub fn params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| RpcError::invalid_params(e.to_string()))
}

/// Serialize a method result.
pub fn result<T: Serialize>(value: T) -> Result<Value, RpcError> {
    Ok(serde_json::to_value(value)?)
}

/// What an endpoint answers with: a single response, a batch, or nothing
/// when every call was a notification.
#[derive(Debug)]
pub enum RpcReply {
    Single(RpcResponse),
    Batch(Vec<RpcResponse>),
    Empty,
}

impl IntoResponse for RpcReply {
    fn into_response(self) -> Response {
        match self {
            RpcReply::Single(r) => Json(r).into_response(),
            RpcReply::Batch(rs) => Json(rs).into_response(),
            RpcReply::Empty => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Run every call in `body` through `call(method, params)`.
pub async fn handle<F, Fut>(body: &[u8], call: F) -> RpcReply
where
    F: Fn(String, Value) -> Fut,
    Fut: Future<Output = Result<Value, RpcError>>,
{
    let payload: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            return RpcReply::Single(RpcResponse::new(
                Value::Null,
                Err(RpcError::new(PARSE_ERROR, format!("Parse error: {}", e))),
            ))
        }
    };

    match payload {
        Value::Array(items) if items.is_empty() => RpcReply::Single(RpcResponse::new(
            Value::Null,
            Err(RpcError::new(INVALID_REQUEST, "Empty batch")),
        )),
        Value::Array(items) => {
            let replies =
                futures::future::join_all(items.into_iter().map(|item| handle_one(item, &call)))
                    .await;
            let replies: Vec<RpcResponse> = replies.into_iter().flatten().collect();
            if replies.is_empty() {
                RpcReply::Empty
            } else {
                RpcReply::Batch(replies)
            }
        }
        single => match handle_one(single, &call).await {
            Some(reply) => RpcReply::Single(reply),
            None => RpcReply::Empty,
        },
    }
}

async fn handle_one<F, Fut>(item: Value, call: &F) -> Option<RpcResponse>
where
    F: Fn(String, Value) -> Fut,
    Fut: Future<Output = Result<Value, RpcError>>,
{
    let request: RpcRequest = match serde_json::from_value(item) {
        Ok(r) => r,
        Err(e) => {
            return Some(RpcResponse::new(
                Value::Null,
                Err(RpcError::new(INVALID_REQUEST, format!("Invalid request: {}", e))),
            ))
        }
    };
    if request.jsonrpc != "2.0" {
        return Some(RpcResponse::new(
            request.id.unwrap_or(Value::Null),
            Err(RpcError::new(INVALID_REQUEST, "Unsupported jsonrpc version")),
        ));
    }

    tracing::debug!("RPC call {}", request.method);
    let outcome = call(request.method, request.params).await;
    request.id.map(|id| RpcResponse::new(id, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldError, FieldErrorKind};
    use serde_json::json;

    async fn echo(method: String, params: Value) -> Result<Value, RpcError> {
        match method.as_str() {
            "echo" => Ok(params),
            "missing" => Err(ServiceError::NotFound.into()),
            _ => Err(RpcError::method_not_found(&method)),
        }
    }

    fn single(reply: RpcReply) -> RpcResponse {
        match reply {
            RpcReply::Single(r) => r,
            other => panic!("expected single reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_single_call() {
        let body = json!({"jsonrpc": "2.0", "method": "echo", "params": {"a": 1}, "id": 7});
        let reply = single(handle(body.to_string().as_bytes(), echo).await);
        assert_eq!(reply.id, json!(7));
        assert_eq!(reply.result, Some(json!({"a": 1})));
        assert!(reply.error.is_none());
    }

    #[tokio::test]
    async fn test_parse_and_request_errors() {
        let reply = single(handle(b"{not json", echo).await);
        assert_eq!(reply.error.unwrap().code, PARSE_ERROR);

        let reply = single(handle(b"[]", echo).await);
        assert_eq!(reply.error.unwrap().code, INVALID_REQUEST);

        let reply = single(handle(br#"{"jsonrpc":"1.0","method":"echo","id":1}"#, echo).await);
        assert_eq!(reply.error.unwrap().code, INVALID_REQUEST);

        let reply = single(handle(br#"{"jsonrpc":"2.0","method":"nope","id":1}"#, echo).await);
        assert_eq!(reply.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_drops_notifications() {
        let body = json!([
            {"jsonrpc": "2.0", "method": "echo", "params": 1, "id": "a"},
            {"jsonrpc": "2.0", "method": "echo", "params": 2},
            {"jsonrpc": "2.0", "method": "missing", "id": "b"},
        ]);
        match handle(body.to_string().as_bytes(), echo).await {
            RpcReply::Batch(replies) => {
                assert_eq!(replies.len(), 2);
                assert_eq!(replies[0].id, json!("a"));
                assert_eq!(replies[0].result, Some(json!(1)));
                assert_eq!(replies[1].error.as_ref().unwrap().code, NOT_FOUND);
            }
            other => panic!("expected batch, got {:?}", other),
        }

        let only_notes = json!([{"jsonrpc": "2.0", "method": "echo"}]);
        assert!(matches!(
            handle(only_notes.to_string().as_bytes(), echo).await,
            RpcReply::Empty
        ));
    }

    #[tokio::test]
    async fn test_null_id_is_answered() {
        let body = json!({"jsonrpc": "2.0", "method": "echo", "params": 3, "id": null});
        let reply = single(handle(body.to_string().as_bytes(), echo).await);
        assert_eq!(reply.id, Value::Null);
        assert_eq!(reply.result, Some(json!(3)));

        let batch = json!([
            {"jsonrpc": "2.0", "method": "echo", "params": 1, "id": null},
            {"jsonrpc": "2.0", "method": "echo", "params": 2},
        ]);
        match handle(batch.to_string().as_bytes(), echo).await {
            RpcReply::Batch(replies) => {
                assert_eq!(replies.len(), 1);
                assert_eq!(replies[0].id, Value::Null);
                assert_eq!(replies[0].result, Some(json!(1)));
            }
            other => panic!("expected batch, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_carries_fields() {
        let err: RpcError = ServiceError::Validation(vec![
            FieldError::new("title", FieldErrorKind::Max).with_max(Some(255)),
        ])
        .into();
        assert_eq!(err.code, VALIDATION_FAILED);
        assert_eq!(
            err.data,
            Some(json!([{"field": "title", "error": "max", "constraint": {"max": 255}}]))
        );
    }

    #[test]
    fn test_params_accepts_missing_object() {
        #[derive(Deserialize)]
        struct Opt {
            id: Option<i64>,
        }
        let p: Opt = params(Value::Null).unwrap();
        assert_eq!(p.id, None);

        #[derive(Debug, Deserialize)]
        struct Req {
            #[allow(dead_code)]
            id: i64,
        }
        let err = params::<Req>(json!({"id": "x"})).unwrap_err();
        assert_eq!(err.code, INVALID_PARAMS);
    }
}
