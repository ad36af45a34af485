//! Conversation turns and context, as held by the memory repository

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::identity::AgentIdentity;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message providing instructions
    System,
    /// User/task-input message
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool execution observation
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single turn in an agent's conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who produced this turn
    pub role: Role,
    /// The turn's content
    pub content: String,
    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
    /// Optional structured metadata (e.g. tool call id, truncation marker)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ConversationTurn {
    /// Build a turn stamped with the current time
    pub fn new(role: Role, content: impl Into<String>, metadata: Option<Value>) -> Self {
        ConversationTurn {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// A snapshot of an agent's identity and conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Whose context this is
    pub agent_identity: AgentIdentity,
    /// Turns in chronological order
    pub conversation_history: Vec<ConversationTurn>,
    /// Free-form metadata about this context snapshot
    pub context_metadata: Value,
    /// When this snapshot was built
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Tool.to_string(), "tool");
    }

    #[test]
    fn test_turn_construction() {
        let turn = ConversationTurn::new(Role::Assistant, "hi", None);
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, "hi");
    }
}
