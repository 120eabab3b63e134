// File: src/envelope.rs
// Purpose: Consistent JSON response envelopes

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::response::Response;

/// `{"ok": true, "data"?, "message"?}` or
/// `{"ok": false, "error", "code", "details"?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl JsonEnvelope {
    /// Empty messages are left out
    pub fn success(data: Option<Value>, message: Option<&str>) -> Self {
        Self {
            ok: true,
            data,
            message: message.filter(|m| !m.is_empty()).map(str::to_string),
            error: None,
            code: None,
            details: None,
        }
    }

    pub fn error(message: impl Into<String>, code: u16, details: Option<Value>) -> Self {
        Self {
            ok: false,
            data: None,
            message: None,
            error: Some(message.into()),
            code: Some(code),
            details: details.filter(|d| !d.is_null()),
        }
    }

    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<JsonEnvelope> for Value {
    fn from(envelope: JsonEnvelope) -> Self {
        envelope.into_value()
    }
}

/// JSON error response carrying `status` both as HTTP status and as `code`
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let mut response = Response::new();
    response
        .set_status(status)
        .json(JsonEnvelope::error(message, status.as_u16(), None));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_success_shapes() {
        assert_eq!(JsonEnvelope::success(None, None).into_value(), json!({"ok": true}));
        assert_eq!(
            JsonEnvelope::success(Some(json!([1])), Some("done")).into_value(),
            json!({"ok": true, "data": [1], "message": "done"})
        );
        assert_eq!(JsonEnvelope::success(None, Some("")).into_value(), json!({"ok": true}));
    }

    #[test]
    fn test_error_shapes() {
        assert_eq!(
            JsonEnvelope::error("Not found", 404, None).into_value(),
            json!({"ok": false, "error": "Not found", "code": 404})
        );
        assert_eq!(
            JsonEnvelope::error("Invalid", 422, Some(json!({"field": "email"}))).into_value(),
            json!({"ok": false, "error": "Invalid", "code": 422, "details": {"field": "email"}})
        );
    }

    #[test]
    fn test_error_key_order() {
        let text = JsonEnvelope::error("Unauthorized", 401, None).into_value().to_string();
        assert_eq!(text, r#"{"ok":false,"error":"Unauthorized","code":401}"#);
    }

    #[test]
    fn test_error_response() {
        let res = error_response(StatusCode::NOT_FOUND, "Not found");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.render_body(),
            br#"{"ok":false,"error":"Not found","code":404}"#.to_vec()
        );
    }
}
