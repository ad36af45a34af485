//! Storage abstractions for agent registration and conversation memory

mod agent;
mod memory;

pub use agent::InMemoryAgentRepository;
pub use memory::InMemoryMemoryRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{ConversationContext, ConversationTurn, RegisteredAgent};
use crate::error::Result;

/// Persists and retrieves per-agent conversation turns
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    async fn save_turn(&self, agent_id: Uuid, turn: ConversationTurn) -> Result<()>;

    async fn append_turns(&self, agent_id: Uuid, turns: Vec<ConversationTurn>) -> Result<()>;

    async fn get_conversation_history(&self, agent_id: Uuid, limit: Option<usize>) -> Result<Vec<ConversationTurn>>;

    async fn get_context(&self, agent_id: Uuid, agent_repo: &dyn AgentRepository) -> Result<ConversationContext>;

    async fn clear_agent_memory(&self, agent_id: Uuid) -> Result<()>;

    async fn delete_agent_memory(&self, agent_id: Uuid) -> Result<()>;

    async fn exists(&self, agent_id: Uuid) -> Result<bool>;

    async fn get_turn_count(&self, agent_id: Uuid) -> Result<usize>;

    async fn get_all_agent_ids(&self) -> Result<Vec<Uuid>>;

    async fn get_last_turn(&self, agent_id: Uuid) -> Result<Option<ConversationTurn>>;

    async fn clear_all(&self) -> Result<()>;
}

/// Registers and looks up agents by id or name
#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn save(&self, agent: RegisteredAgent) -> Result<()>;

    async fn find_by_id(&self, agent_id: Uuid) -> Result<Option<RegisteredAgent>>;

    async fn find_by_name(&self, agent_name: &str) -> Result<Option<RegisteredAgent>>;

    async fn find_all(&self) -> Result<Vec<RegisteredAgent>>;

    async fn find_active(&self) -> Result<Vec<RegisteredAgent>>;

    async fn exists(&self, agent_id: Uuid) -> Result<bool>;

    async fn exists_by_name(&self, agent_name: &str) -> Result<bool>;

    async fn delete(&self, agent_id: Uuid) -> Result<bool>;

    async fn count(&self) -> Result<usize>;

    async fn clear(&self) -> Result<()>;
}
