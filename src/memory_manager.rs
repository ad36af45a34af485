//! Facade over a `MemoryRepository` adding an LRU context cache

use std::sync::Arc;

use moka::sync::Cache;
use uuid::Uuid;

use crate::domain::{ConversationContext, ConversationTurn};
use crate::error::Result;
use crate::repository::{AgentRepository, MemoryRepository};

/// Default capacity of the recently-built-context cache
pub const DEFAULT_CACHE_CAPACITY: u64 = 128;

/// Wraps a `MemoryRepository`, caching built `ConversationContext`s by agent id
///
/// `save_turn`/`append_turns` invalidate the cache entry for the
/// affected agent so the next `build_context` call rebuilds from the
/// repository rather than serving a stale snapshot.
pub struct MemoryManager {
    repository: Arc<dyn MemoryRepository>,
    cache: Cache<Uuid, ConversationContext>,
}

impl MemoryManager {
    pub fn new(repository: Arc<dyn MemoryRepository>) -> Self {
        Self::with_capacity(repository, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(repository: Arc<dyn MemoryRepository>, capacity: u64) -> Self {
        MemoryManager {
            repository,
            cache: Cache::new(capacity),
        }
    }

    pub async fn save_turn(&self, agent_id: Uuid, turn: ConversationTurn) -> Result<()> {
        self.repository.save_turn(agent_id, turn).await?;
        self.cache.invalidate(&agent_id);
        Ok(())
    }

    pub async fn append_turns(&self, agent_id: Uuid, turns: Vec<ConversationTurn>) -> Result<()> {
        self.repository.append_turns(agent_id, turns).await?;
        self.cache.invalidate(&agent_id);
        Ok(())
    }

    /// Returns the cached context if present, otherwise builds and caches one
    pub async fn build_context(
        &self,
        agent_id: Uuid,
        agent_repo: &dyn AgentRepository,
    ) -> Result<ConversationContext> {
        if let Some(cached) = self.cache.get(&agent_id) {
            return Ok(cached);
        }
        let context = self.repository.get_context(agent_id, agent_repo).await?;
        self.cache.insert(agent_id, context.clone());
        Ok(context)
    }

    pub fn invalidate(&self, agent_id: Uuid) {
        self.cache.invalidate(&agent_id);
    }

    pub fn repository(&self) -> &Arc<dyn MemoryRepository> {
        &self.repository
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgentCapabilities, RegisteredAgent, Role};
    use crate::repository::{InMemoryAgentRepository, InMemoryMemoryRepository};

    #[tokio::test]
    async fn test_build_context_caches() {
        let memory_repo: Arc<dyn MemoryRepository> = Arc::new(InMemoryMemoryRepository::new());
        let agent_repo = InMemoryAgentRepository::new();
        let agent = RegisteredAgent::new("coder", AgentCapabilities::unrestricted(5), None);
        let agent_id = agent.agent_id();
        agent_repo.save(agent).await.unwrap();

        let manager = MemoryManager::new(memory_repo.clone());
        manager.save_turn(agent_id, ConversationTurn::new(Role::User, "first", None)).await.unwrap();

        let first = manager.build_context(agent_id, &agent_repo).await.unwrap();
        assert_eq!(first.conversation_history.len(), 1);

        // write directly to the repository, bypassing the manager's invalidation
        memory_repo.save_turn(agent_id, ConversationTurn::new(Role::User, "second", None)).await.unwrap();
        let cached = manager.build_context(agent_id, &agent_repo).await.unwrap();
        assert_eq!(cached.conversation_history.len(), 1, "stale repository write should not affect cache");

        manager.invalidate(agent_id);
        let refreshed = manager.build_context(agent_id, &agent_repo).await.unwrap();
        assert_eq!(refreshed.conversation_history.len(), 2);
    }

    #[tokio::test]
    async fn test_save_turn_invalidates_cache() {
        let memory_repo: Arc<dyn MemoryRepository> = Arc::new(InMemoryMemoryRepository::new());
        let agent_repo = InMemoryAgentRepository::new();
        let agent = RegisteredAgent::new("researcher", AgentCapabilities::unrestricted(5), None);
        let agent_id = agent.agent_id();
        agent_repo.save(agent).await.unwrap();

        let manager = MemoryManager::new(memory_repo);
        manager.build_context(agent_id, &agent_repo).await.unwrap();
        manager.save_turn(agent_id, ConversationTurn::new(Role::User, "new turn", None)).await.unwrap();
        let context = manager.build_context(agent_id, &agent_repo).await.unwrap();
        assert_eq!(context.conversation_history.len(), 1);
    }
}
