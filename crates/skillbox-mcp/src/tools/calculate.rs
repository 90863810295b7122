//! `calculate` tool. Evaluate an arithmetic expression.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct CalculateParams {
    #[serde(default)]
    expression: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "calculate".to_string(),
        description: "Evaluates an arithmetic expression using + - * / // % ** and parentheses"
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Expression to evaluate, e.g. \"25 * 4\""
                }
            },
            "required": ["expression"]
        }),
    }
}

pub fn execute(args: Value) -> McpResult<ToolCallResult> {
    let params: CalculateParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let expression = params.expression.trim();
    match skillbox::evaluate(expression) {
        Ok(value) => Ok(ToolCallResult::text(format!("{expression} = {value}"))),
        Err(e) => Ok(ToolCallResult::error(format!("Error: {e}"))),
    }
}
