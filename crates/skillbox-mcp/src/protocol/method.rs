//! Method names understood by the dispatcher.

/// A decoded JSON-RPC method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method<'a> {
    Initialize,
    /// One-way lifecycle notifications. Never answered, even with an `id`.
    Lifecycle(&'a str),
    ToolsList,
    ToolsCall,
    Ping,
    /// Anything else. Answered with an empty result.
    Other(&'a str),
}

impl<'a> Method<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "notifications/initialized" | "initialized" | "notifications/cancelled" => {
                Method::Lifecycle(name)
            }
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            "ping" => Method::Ping,
            other => Method::Other(other),
        }
    }

    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Method::Lifecycle(_))
    }
}
