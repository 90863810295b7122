//! MCP tool implementations.

pub mod add;
pub mod calculate;
pub mod echo;
pub mod generate_logs;
pub mod registry;

pub use registry::{ToolHandler, ToolRegistry};
