//! Tool metadata, invocation and outcome types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The declared type of a tool parameter, used for schema exposure and coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolParamType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
    Object,
}

/// A single declared parameter for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: ToolParamType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
}

impl ToolParameter {
    pub fn required(name: impl Into<String>, param_type: ToolParamType, description: impl Into<String>) -> Self {
        ToolParameter {
            name: name.into(),
            param_type,
            required: true,
            default: None,
            description: description.into(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: ToolParamType,
        description: impl Into<String>,
        default: Value,
    ) -> Self {
        ToolParameter {
            name: name.into(),
            param_type,
            required: false,
            default: Some(default),
            description: description.into(),
        }
    }
}

/// Name, description, and declared parameters of a single tool, as exposed in the prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    /// Free-form grouping label used by `ToolRegistry::list` filtering (e.g. `"filesystem"`, `"shell"`)
    pub category: String,
    /// Whether this tool declares itself dangerous, independent of the scheduler's hardcoded name set
    pub dangerous: bool,
}

/// A tool invocation parsed out of an agent's response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

/// The shape of a tool's output, not an inheritance hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Plain text to be fed back into the conversation
    Text(String),
    /// Structured data a downstream step can consume directly
    Structured(Value),
    /// The call was rejected before execution (authorization, gating, bad arguments)
    Rejected(String),
}

impl TaskOutcome {
    /// Render the outcome as the text that gets appended to conversation history
    pub fn as_display_text(&self) -> String {
        match self {
            TaskOutcome::Text(s) => s.clone(),
            TaskOutcome::Structured(v) => v.to_string(),
            TaskOutcome::Rejected(reason) => reason.clone(),
        }
    }
}

/// The full result of a tool call: outcome plus the bookkeeping the reasoning loop needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub outcome: TaskOutcome,
    /// Set to the tool name when this call was a control tool (`task_success`/`task_error`/`tasks_completed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
}

impl ToolResult {
    pub fn success(outcome: TaskOutcome) -> Self {
        ToolResult { success: true, outcome, cmd: None }
    }

    pub fn failure(outcome: TaskOutcome) -> Self {
        ToolResult { success: false, outcome, cmd: None }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        ToolResult {
            success: false,
            outcome: TaskOutcome::Rejected(reason.into()),
            cmd: None,
        }
    }

    pub fn control(cmd: impl Into<String>, success: bool, outcome: TaskOutcome) -> Self {
        ToolResult { success, outcome, cmd: Some(cmd.into()) }
    }

    /// Whether this result terminates the reasoning loop
    pub fn is_control(&self) -> bool {
        self.cmd.is_some()
    }
}
