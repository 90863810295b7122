//! MCP request parameter types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::present;

/// `tools/call` params.
///
/// `name` is kept as raw JSON: a missing name is looked up as the empty
/// string, and a present name that is not a string (`null` included) never
/// matches a tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallParams {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Value>,
    #[serde(default)]
    pub arguments: Option<Value>,
}
