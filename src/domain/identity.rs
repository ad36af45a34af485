//! Agent identity, capabilities, and registration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity for a registered agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Unique agent id
    pub agent_id: Uuid,
    /// Human-readable, unique agent name
    pub agent_name: String,
    /// When this identity was created
    pub creation_timestamp: DateTime<Utc>,
}

impl AgentIdentity {
    /// Create a new identity with a random id and the current timestamp
    pub fn new(agent_name: impl Into<String>) -> Self {
        AgentIdentity {
            agent_id: Uuid::new_v4(),
            agent_name: agent_name.into(),
            creation_timestamp: Utc::now(),
        }
    }
}

/// What an agent is allowed to do
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Free-form tags describing what this agent is good at (e.g. "coder", "researcher")
    pub capability_tags: Vec<String>,
    /// Tool names this agent may invoke. Empty means all registered tools are permitted.
    pub authorized_tools: Vec<String>,
    /// Maximum reasoning-loop iterations before the agent is cut off
    pub max_iterations: u32,
}

impl AgentCapabilities {
    /// Build capabilities that may use every registered tool
    pub fn unrestricted(max_iterations: u32) -> Self {
        AgentCapabilities {
            capability_tags: Vec::new(),
            authorized_tools: Vec::new(),
            max_iterations,
        }
    }

    /// Whether `tool_name` is permitted under this capability set
    pub fn allows_tool(&self, tool_name: &str) -> bool {
        self.authorized_tools.is_empty() || self.authorized_tools.iter().any(|t| t == tool_name)
    }
}

/// An agent identity and capability set as stored in the agent repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredAgent {
    /// Stable identity
    pub identity: AgentIdentity,
    /// Authorization and iteration budget
    pub capabilities: AgentCapabilities,
    /// Whether the agent accepts new work
    pub is_active: bool,
    /// Agent-specific system prompt override
    pub system_prompt: Option<String>,
}

impl RegisteredAgent {
    /// Construct a new active agent
    pub fn new(
        agent_name: impl Into<String>,
        capabilities: AgentCapabilities,
        system_prompt: Option<String>,
    ) -> Self {
        RegisteredAgent {
            identity: AgentIdentity::new(agent_name),
            capabilities,
            is_active: true,
            system_prompt,
        }
    }

    /// The agent's unique id
    pub fn agent_id(&self) -> Uuid {
        self.identity.agent_id
    }

    /// The agent's unique name
    pub fn agent_name(&self) -> &str {
        &self.identity.agent_name
    }
}
