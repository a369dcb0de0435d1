//! Response envelope shared by every endpoint.
//!
//! Bodies look like `{"ok": bool, "msg"?, "data"?, "result"?, "count"?, "errors"?}`.
//! Array payloads also report their length in `count`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name, or `body` when the payload as a whole was rejected.
    pub path: String,
    /// Human-readable reason.
    pub msg: String,
}

/// JSON envelope.
#[derive(Debug, Default, Serialize)]
pub struct ApiResponse {
    /// Whether the request succeeded.
    pub ok: bool,
    /// Status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Single-object payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Collection payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Length of an array payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Field validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

fn array_len(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

fn to_value<T: Serialize>(payload: T) -> Value {
    // Our payload types serialize infallibly; Null is unreachable in practice.
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

/// 200 with `data`.
pub fn success<T: Serialize>(data: T) -> Response {
    let data = to_value(data);
    let body = ApiResponse {
        ok: true,
        count: array_len(&data),
        data: Some(data),
        ..ApiResponse::default()
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// 200 with `result`.
pub fn success_with_result<T: Serialize>(result: T) -> Response {
    let result = to_value(result);
    let body = ApiResponse {
        ok: true,
        count: array_len(&result),
        result: Some(result),
        ..ApiResponse::default()
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// 201 with a message.
pub fn created(msg: impl Into<String>) -> Response {
    let body = ApiResponse {
        ok: true,
        msg: Some(msg.into()),
        ..ApiResponse::default()
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// 204 without a body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Failure with a message.
pub fn error(status: StatusCode, msg: impl Into<String>) -> Response {
    let body = ApiResponse {
        ok: false,
        msg: Some(msg.into()),
        ..ApiResponse::default()
    };
    (status, Json(body)).into_response()
}

/// 400 "Validation failed" with the offending fields.
pub fn validation_failed(errors: Vec<FieldError>) -> Response {
    let body = ApiResponse {
        ok: false,
        msg: Some("Validation failed".to_string()),
        errors: Some(errors),
        ..ApiResponse::default()
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
