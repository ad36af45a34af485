//! Tool registry - holds the set of tools available to the scheduler

use std::collections::HashMap;

use crate::domain::{TaskOutcome, ToolCall, ToolMetadata, ToolResult};

use super::traits::Tool;

/// Registry of available tools, keyed by name
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry { tools: HashMap::new() }
    }

    /// Registers a tool under its own name. Duplicate registration is a
    /// no-op, not an error, so that a reload of an already-registered tool
    /// doesn't silently replace a live instance mid-use.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            tracing::warn!(tool = %name, "duplicate tool registration ignored");
            return;
        }
        self.tools.insert(name, Box::new(tool));
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn get_info(&self, name: &str) -> Option<ToolMetadata> {
        self.metadata_for(name)
    }

    pub fn metadata_for(&self, name: &str) -> Option<ToolMetadata> {
        self.get(name).map(|t| t.to_metadata())
    }

    /// Full tool catalog, rendered into the prompt
    pub fn catalog(&self) -> Vec<ToolMetadata> {
        self.tools.values().map(|t| t.to_metadata()).collect()
    }

    /// Filtered catalog: `category` restricts to a single category when set,
    /// `include_dangerous` controls whether `dangerous: true` tools are included.
    pub fn list(&self, category: Option<&str>, include_dangerous: bool) -> Vec<ToolMetadata> {
        self.catalog()
            .into_iter()
            .filter(|m| category.map(|c| m.category == c).unwrap_or(true))
            .filter(|m| include_dangerous || !m.dangerous)
            .collect()
    }

    /// Execute a call against the registry directly, with no gating or coercion.
    ///
    /// An unknown tool name resolves to a rejected result rather than an
    /// error: a bad tool name from the LLM must not crash the reasoning loop.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.get(&call.tool_name) {
            Some(tool) => match tool.execute(call.arguments.clone()).await {
                Ok(outcome) => ToolResult::success(outcome),
                Err(e) => ToolResult::failure(TaskOutcome::Rejected(e.to_string())),
            },
            None => ToolResult::rejected(format!("unknown tool: {}", call.tool_name)),
        }
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}
