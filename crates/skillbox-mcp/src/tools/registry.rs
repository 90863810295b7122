//! Tool registration and dispatch.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{add, calculate, echo, generate_logs};

/// Executable half of a registered tool.
pub type ToolHandler = Box<dyn Fn(Value) -> McpResult<ToolCallResult> + Send + Sync>;

type BuiltinTool = (fn() -> ToolDefinition, fn(Value) -> McpResult<ToolCallResult>);

/// Built-in tools in the order they are listed to clients.
const BUILTIN_TOOLS: &[BuiltinTool] = &[
    (echo::definition, echo::execute),
    (add::definition, add::execute),
    (calculate::definition, calculate::execute),
    (generate_logs::definition, generate_logs::execute),
];

struct RegisteredTool {
    definition: ToolDefinition,
    handler: ToolHandler,
}

/// The set of tools a server exposes.
///
/// Built once at startup and shared read-only (usually behind an `Arc`)
/// afterwards. Names are unique and matched exactly.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in tool.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (definition, execute) in BUILTIN_TOOLS {
            // Built-in names are distinct, so registration cannot fail.
            if let Err(e) = registry.register(definition(), *execute) {
                tracing::error!("Failed to register built-in tool: {e}");
            }
        }
        registry
    }

    /// A registry holding only the named built-in tools, in built-in order.
    pub fn builtin_filtered<S: AsRef<str>>(names: &[S]) -> McpResult<Self> {
        let known: Vec<String> = BUILTIN_TOOLS.iter().map(|(def, _)| def().name).collect();
        if let Some(unknown) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|name| !known.iter().any(|k| k == name))
        {
            return Err(McpError::ToolNotFound(unknown.to_string()));
        }

        let mut registry = Self::new();
        for (definition, execute) in BUILTIN_TOOLS {
            let definition = definition();
            if names.iter().any(|n| n.as_ref() == definition.name) {
                registry.register(definition, *execute)?;
            }
        }
        Ok(registry)
    }

    /// Register a tool. Fails if a tool with the same name already exists.
    pub fn register<F>(&mut self, definition: ToolDefinition, handler: F) -> McpResult<()>
    where
        F: Fn(Value) -> McpResult<ToolCallResult> + Send + Sync + 'static,
    {
        if self.index.contains_key(&definition.name) {
            return Err(McpError::DuplicateTool(definition.name));
        }
        tracing::debug!("Registered tool {}", definition.name);
        self.index.insert(definition.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// All tool definitions in registration order.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i].definition)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run a tool.
    ///
    /// Missing or `null` arguments are passed as `{}`. Any handler error or
    /// panic comes back as [`McpError::HandlerFault`].
    pub fn call(&self, name: &str, arguments: Option<Value>) -> McpResult<ToolCallResult> {
        let tool = self
            .index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

        let args = match arguments {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(args) => args,
        };

        match panic::catch_unwind(AssertUnwindSafe(|| (tool.handler)(args))) {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(McpError::HandlerFault(message))) => Err(McpError::HandlerFault(message)),
            Ok(Err(e)) => Err(McpError::HandlerFault(e.to_string())),
            Err(panic_info) => {
                let msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                tracing::error!("Tool {name} panicked: {msg}");
                Err(McpError::HandlerFault(msg))
            }
        }
    }
}
