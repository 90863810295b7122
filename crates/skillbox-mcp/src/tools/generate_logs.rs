//! `generate_logs` tool. Produce mock log lines.

use serde::Deserialize;
use serde_json::{json, Value};

use skillbox::{LevelFilter, LogGenerator, MAX_LOG_COUNT};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

fn default_count() -> i64 {
    5
}

fn default_level() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize)]
struct GenerateLogsParams {
    #[serde(default = "default_count")]
    count: i64,
    #[serde(default = "default_level")]
    level: String,
    #[serde(default)]
    seed: Option<u64>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_logs".to_string(),
        description: "Generates mock log entries for testing log pipelines".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "count": {
                    "type": "integer",
                    "default": 5,
                    "minimum": 0,
                    "maximum": MAX_LOG_COUNT,
                    "description": "Number of entries"
                },
                "level": {
                    "type": "string",
                    "enum": ["info", "warn", "error", "debug", "all"],
                    "default": "all",
                    "description": "Only emit entries of this level"
                },
                "seed": { "type": "integer", "description": "Seed for reproducible output" }
            }
        }),
    }
}

pub fn execute(args: Value) -> McpResult<ToolCallResult> {
    let params: GenerateLogsParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let filter: LevelFilter = match params.level.parse() {
        Ok(filter) => filter,
        Err(e) => return Ok(ToolCallResult::error(format!("Error: {e}"))),
    };

    let count = usize::try_from(params.count.max(0)).unwrap_or(MAX_LOG_COUNT);
    let mut generator = params.seed.map(LogGenerator::seeded).unwrap_or_default();
    let lines: Vec<String> = generator
        .generate_now(count, filter)
        .iter()
        .map(ToString::to_string)
        .collect();

    Ok(ToolCallResult::text(lines.join("\n")))
}
