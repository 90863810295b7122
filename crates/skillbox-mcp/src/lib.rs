//! Skillbox MCP Server: line-delimited JSON-RPC access to a small set of skills.

pub mod config;
pub mod protocol;
pub mod repl;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_log_filter, resolve_tool_filter};
pub use protocol::ProtocolHandler;
pub use tools::ToolRegistry;
pub use transport::StdioTransport;
