//! Core data model: agent identity, conversation state, tool contracts, and plans

mod conversation;
mod identity;
mod output;
mod plan;
mod tool;

pub use conversation::{ConversationContext, ConversationTurn, Role};
pub use identity::{AgentCapabilities, AgentIdentity, RegisteredAgent};
pub use output::AgentOutput;
pub use plan::{
    ActionStep, CompletedStep, ExecutionPlan, TaskAssignment, TodoListState, TodoStep, TodoStepStatus,
};
pub use tool::{TaskOutcome, ToolCall, ToolMetadata, ToolParamType, ToolParameter, ToolResult};
