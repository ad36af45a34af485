//! Builds `ConversationContext` by merging memory and agent repositories

use uuid::Uuid;

use crate::domain::ConversationContext;
use crate::error::Result;
use crate::memory_manager::MemoryManager;
use crate::repository::AgentRepository;

/// Merges conversation history with agent identity into a single context
///
/// A thin wrapper over `MemoryManager::build_context`; exists as its own
/// type so callers depend on "build me a context" rather than reaching
/// into the memory cache directly.
pub struct ContextManager;

impl ContextManager {
    pub async fn build_context(
        agent_id: Uuid,
        memory: &MemoryManager,
        agent_repo: &dyn AgentRepository,
    ) -> Result<ConversationContext> {
        memory.build_context(agent_id, agent_repo).await
    }
}
