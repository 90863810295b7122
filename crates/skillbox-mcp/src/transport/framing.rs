//! Message framing for newline-delimited JSON.

use serde_json::Value;

use crate::types::{JsonRpcReply, JsonRpcRequest, McpError, McpResult};

/// Parse a single line of text as a JSON-RPC request.
///
/// The line must hold one JSON object. Anything else is a parse error, which
/// callers skip without replying.
pub fn parse_message(line: &str) -> McpResult<JsonRpcRequest> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))?;
    if !value.is_object() {
        return Err(McpError::ParseError(
            "Message must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| McpError::ParseError(e.to_string()))
}

/// Serialize a reply to a JSON line (with trailing newline).
pub fn frame_message(reply: &JsonRpcReply) -> McpResult<String> {
    let mut json = serde_json::to_string(reply).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}
