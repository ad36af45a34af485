//! Core tool trait

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{TaskOutcome, ToolMetadata, ToolParameter};
use crate::error::Result;

/// A tool that can be invoked by an agent's reasoning loop
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, matched against the LLM's parsed tool call
    fn name(&self) -> &str;

    /// Short description surfaced in the tool catalog
    fn description(&self) -> &str;

    /// Declared parameters, used for prompt rendering and scheduler coercion
    fn parameters(&self) -> Vec<ToolParameter>;

    /// Grouping label for registry filtering. Defaults to `"general"`.
    fn category(&self) -> &str {
        "general"
    }

    /// Whether this tool declares itself dangerous, independent of the
    /// scheduler's hardcoded dangerous-name set. Defaults to `false`.
    fn dangerous(&self) -> bool {
        false
    }

    /// Run the tool. Coercion, gating and truncation are the scheduler's job,
    /// not the tool's: a `Tool` impl only needs to report what happened.
    async fn execute(&self, args: Map<String, Value>) -> Result<TaskOutcome>;

    /// Metadata as exposed in the tool catalog passed to `PromptBuilder`
    fn to_metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
            category: self.category().to_string(),
            dangerous: self.dangerous(),
        }
    }
}
