//! Error types and JSON-RPC error codes for the MCP server.

use super::message::{JsonRpcError, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const DUPLICATE_TOOL: i32 = -32804;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// A tool handler failed or panicked. The message is the failure itself.
    #[error("{0}")]
    HandlerFault(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) | McpError::HandlerFault(_) | McpError::Io(_) => {
                INTERNAL_ERROR
            }
            McpError::ToolNotFound(_) => TOOL_NOT_FOUND,
            McpError::DuplicateTool(_) => DUPLICATE_TOOL,
            McpError::Json(_) => PARSE_ERROR,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.code(), self.to_string())
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_fault_is_internal_error_with_bare_message() {
        let err = McpError::HandlerFault("division by zero".to_string());
        let rpc = err.to_json_rpc_error(RequestId::from(4));
        assert_eq!(rpc.error.code, error_codes::INTERNAL_ERROR);
        assert_eq!(rpc.error.message, "division by zero");
        assert_eq!(rpc.id, RequestId::from(4));
    }

    #[test]
    fn test_codes() {
        assert_eq!(McpError::ParseError(String::new()).code(), -32700);
        assert_eq!(McpError::InvalidParams(String::new()).code(), -32602);
        assert_eq!(McpError::ToolNotFound(String::new()).code(), -32803);
    }
}
