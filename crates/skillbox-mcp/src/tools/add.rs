//! `add` tool. Add two numbers.

use serde::Deserialize;
use serde_json::{json, Number, Value};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

fn zero() -> Number {
    Number::from(0)
}

#[derive(Debug, Deserialize)]
struct AddParams {
    #[serde(default = "zero")]
    a: Number,
    #[serde(default = "zero")]
    b: Number,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "add".to_string(),
        description: "Adds two numbers together".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "a": { "type": "number", "description": "First number" },
                "b": { "type": "number", "description": "Second number" }
            },
            "required": ["a", "b"]
        }),
    }
}

pub fn execute(args: Value) -> McpResult<ToolCallResult> {
    let params: AddParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let sum = sum(&params.a, &params.b);
    Ok(ToolCallResult::text(format!(
        "Result: {} + {} = {sum}",
        params.a, params.b
    )))
}

/// Integers add exactly; anything else (or an overflowing sum) adds as floats.
fn sum(a: &Number, b: &Number) -> String {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(s) = x.checked_add(y) {
            return s.to_string();
        }
    }
    let x = a.as_f64().unwrap_or_default();
    let y = b.as_f64().unwrap_or_default();
    skillbox::types::format_float(x + y)
}
