//! Skillbox: core skills exposed as tools by the Skillbox MCP server.

pub mod calculator;
pub mod logs;
pub mod types;

pub use calculator::evaluate;
pub use logs::{LevelFilter, LogEntry, LogGenerator, LogLevel, MAX_LOG_COUNT};
pub use types::*;
