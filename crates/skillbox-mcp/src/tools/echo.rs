//! `echo` tool. Echo back the input text.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Default, Deserialize)]
struct EchoParams {
    #[serde(default)]
    text: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "echo".to_string(),
        description: "Echoes back the input text".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "The text to echo" }
            },
            "required": ["text"]
        }),
    }
}

pub fn execute(args: Value) -> McpResult<ToolCallResult> {
    let params: EchoParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    Ok(ToolCallResult::text(format!("Echo: {}", params.text)))
}
