//! Main request dispatcher: receives JSON-RPC requests, routes to handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::tools::ToolRegistry;
use crate::types::*;

use super::method::Method;
use super::negotiation::negotiate;

/// The protocol handler that turns one decoded request into at most one reply.
pub struct ProtocolHandler {
    tools: Arc<ToolRegistry>,
}

impl ProtocolHandler {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Dispatch a request.
    ///
    /// Returns `None` for notifications (no `id`) and for lifecycle
    /// notifications whatever their `id`. Every other request gets exactly one
    /// reply echoing its `id`.
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcReply> {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;
        let parsed = Method::parse(&method);

        if parsed.is_lifecycle() {
            tracing::debug!("Lifecycle notification: {method}");
            return None;
        }

        tracing::debug!("Dispatching {method} (id: {})", DisplayId(id.as_ref()));
        let outcome = self.dispatch(parsed, params);

        let Some(id) = id else {
            if let Err(e) = outcome {
                tracing::warn!("Dropping failure of notification {method}: {e}");
            }
            return None;
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::new(id, result).into(),
            Err(e) => {
                tracing::warn!("Request {id} ({method}) failed: {e}");
                e.to_json_rpc_error(id).into()
            }
        })
    }

    fn dispatch(&self, method: Method<'_>, params: Option<Value>) -> McpResult<Value> {
        match method {
            Method::Initialize => serde_json::to_value(negotiate(params))
                .map_err(|e| McpError::InternalError(e.to_string())),
            Method::ToolsList => self.handle_tools_list(),
            Method::ToolsCall => self.handle_tools_call(params),
            Method::Ping | Method::Lifecycle(_) => Ok(empty_object()),
            Method::Other(name) => {
                tracing::debug!("Unrecognized method {name:?}, answering with empty result");
                Ok(empty_object())
            }
        }
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: self.tools.list_tools(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let ToolCallParams { name, arguments } = match params {
            None => ToolCallParams::default(),
            Some(value @ Value::Object(_)) => serde_json::from_value(value)
                .map_err(|e| McpError::InternalError(e.to_string()))?,
            Some(other) => {
                return Err(McpError::InternalError(format!(
                    "tools/call params must be an object, got {other}"
                )));
            }
        };

        let outcome = match name {
            None => self.tools.call("", arguments),
            Some(Value::String(name)) => self.tools.call(&name, arguments),
            Some(other) => Err(McpError::ToolNotFound(other.to_string())),
        };

        let result = match outcome {
            Ok(result) => result,
            Err(McpError::ToolNotFound(name)) => {
                tracing::debug!("Unknown tool requested: {name:?}");
                ToolCallResult::error(format!("Unknown tool: {name}"))
            }
            Err(e) => return Err(e),
        };

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Log helper for an optional id.
struct DisplayId<'a>(Option<&'a RequestId>);

impl std::fmt::Display for DisplayId<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "none"),
        }
    }
}
