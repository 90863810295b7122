//! JSON-RPC 2.0 message types for the MCP protocol.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier, echoed verbatim in the reply.
///
/// `Null` is a real identifier: a request carrying `"id": null` still gets a
/// reply. Only a missing `id` key marks a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(serde_json::Number),
    Null,
    Other(Value),
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
            RequestId::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

/// Decode a present key, including `null`, as `Some`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// An inbound JSON-RPC 2.0 request or notification.
///
/// Decoding is permissive: a missing `jsonrpc` or `method` becomes an empty
/// string and is routed like any other unrecognized method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub method: String,
    /// A present `"params": null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: Option<RequestId>, method: &str, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    /// A request without an `id` is a notification and never gets a reply.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

/// Error object within a JSON-RPC error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// The single outbound line produced for a request: a result or an error,
/// never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    Error(JsonRpcError),
    Response(JsonRpcResponse),
}

impl JsonRpcReply {
    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcReply::Response(r) => &r.id,
            JsonRpcReply::Error(e) => &e.id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcReply::Error(_))
    }
}

impl From<JsonRpcResponse> for JsonRpcReply {
    fn from(response: JsonRpcResponse) -> Self {
        JsonRpcReply::Response(response)
    }
}

impl From<JsonRpcError> for JsonRpcReply {
    fn from(error: JsonRpcError) -> Self {
        JsonRpcReply::Error(error)
    }
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code,
                message,
                data: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> JsonRpcRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_id_is_notification() {
        let req = decode(json!({"jsonrpc": "2.0", "method": "initialized"}));
        assert!(req.is_notification());
    }

    #[test]
    fn test_falsy_ids_are_present() {
        for id in [json!(0), json!(""), json!(null), json!(false)] {
            let req = decode(json!({"jsonrpc": "2.0", "id": id, "method": "ping"}));
            assert!(!req.is_notification(), "id {id} should be present");
        }
        let req = decode(json!({"id": null, "method": "ping"}));
        assert_eq!(req.id, Some(RequestId::Null));
    }

    #[test]
    fn test_id_variants() {
        let req = decode(json!({"id": "abc", "method": "ping"}));
        assert_eq!(req.id, Some(RequestId::from("abc")));
        let req = decode(json!({"id": 7, "method": "ping"}));
        assert_eq!(req.id, Some(RequestId::from(7)));
        let req = decode(json!({"id": 1.5, "method": "ping"}));
        assert_eq!(serde_json::to_value(req.id).unwrap(), json!(1.5));
    }

    #[test]
    fn test_missing_method_defaults_to_empty() {
        let req = decode(json!({"id": 1}));
        assert_eq!(req.method, "");
        assert!(req.params.is_none());
        let req = decode(json!({"id": 1, "method": "tools/call", "params": null}));
        assert_eq!(req.params, Some(Value::Null));
    }

    #[test]
    fn test_reply_carries_exactly_one_payload() {
        let ok: JsonRpcReply = JsonRpcResponse::new(RequestId::from(1), json!({})).into();
        let value = serde_json::to_value(&ok).unwrap();
        assert!(value.get("result").is_some());
        assert!(value.get("error").is_none());

        let err: JsonRpcReply =
            JsonRpcError::new(RequestId::from(1), -32603, "boom".to_string()).into();
        let value = serde_json::to_value(&err).unwrap();
        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], -32603);
        assert_eq!(value["error"]["message"], "boom");
        assert!(err.is_error());
    }
}
