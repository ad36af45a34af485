//! In-memory, dual-indexed agent registry

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::RegisteredAgent;
use crate::error::{Error, Result};

use super::AgentRepository;

struct Indexes {
    by_id: HashMap<Uuid, RegisteredAgent>,
    by_name: HashMap<String, Uuid>,
}

impl Indexes {
    fn new() -> Self {
        Indexes { by_id: HashMap::new(), by_name: HashMap::new() }
    }
}

/// Agent repository backed by a single mutex guarding two indexes
///
/// Both maps are updated under one lock so a reader never observes
/// an id registered without its corresponding name, or vice versa.
pub struct InMemoryAgentRepository {
    inner: Mutex<Indexes>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        InMemoryAgentRepository { inner: Mutex::new(Indexes::new()) }
    }
}

impl Default for InMemoryAgentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn save(&self, agent: RegisteredAgent) -> Result<()> {
        let mut idx = self.inner.lock().unwrap();
        let id = agent.agent_id();
        let name = agent.agent_name().to_string();

        if let Some(existing_id) = idx.by_name.get(&name) {
            if *existing_id != id {
                return Err(Error::InvalidInput(format!(
                    "agent name '{name}' already registered to a different agent"
                )));
            }
        }

        idx.by_name.insert(name, id);
        idx.by_id.insert(id, agent);
        Ok(())
    }

    async fn find_by_id(&self, agent_id: Uuid) -> Result<Option<RegisteredAgent>> {
        let idx = self.inner.lock().unwrap();
        Ok(idx.by_id.get(&agent_id).cloned())
    }

    async fn find_by_name(&self, agent_name: &str) -> Result<Option<RegisteredAgent>> {
        let idx = self.inner.lock().unwrap();
        Ok(idx.by_name.get(agent_name).and_then(|id| idx.by_id.get(id)).cloned())
    }

    async fn find_all(&self) -> Result<Vec<RegisteredAgent>> {
        let idx = self.inner.lock().unwrap();
        Ok(idx.by_id.values().cloned().collect())
    }

    async fn find_active(&self) -> Result<Vec<RegisteredAgent>> {
        let idx = self.inner.lock().unwrap();
        Ok(idx.by_id.values().filter(|a| a.is_active).cloned().collect())
    }

    async fn exists(&self, agent_id: Uuid) -> Result<bool> {
        let idx = self.inner.lock().unwrap();
        Ok(idx.by_id.contains_key(&agent_id))
    }

    async fn exists_by_name(&self, agent_name: &str) -> Result<bool> {
        let idx = self.inner.lock().unwrap();
        Ok(idx.by_name.contains_key(agent_name))
    }

    async fn delete(&self, agent_id: Uuid) -> Result<bool> {
        let mut idx = self.inner.lock().unwrap();
        match idx.by_id.remove(&agent_id) {
            Some(agent) => {
                idx.by_name.remove(agent.agent_name());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize> {
        let idx = self.inner.lock().unwrap();
        Ok(idx.by_id.len())
    }

    async fn clear(&self) -> Result<()> {
        let mut idx = self.inner.lock().unwrap();
        idx.by_id.clear();
        idx.by_name.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AgentCapabilities;

    fn sample(name: &str) -> RegisteredAgent {
        RegisteredAgent::new(name, AgentCapabilities::unrestricted(5), None)
    }

    #[tokio::test]
    async fn test_save_and_find_by_id() {
        let repo = InMemoryAgentRepository::new();
        let agent = sample("researcher");
        let id = agent.agent_id();
        repo.save(agent).await.unwrap();
        let found = repo.find_by_id(id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().agent_name(), "researcher");
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let repo = InMemoryAgentRepository::new();
        repo.save(sample("coder")).await.unwrap();
        let found = repo.find_by_name("coder").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_name_collision_with_different_id_rejected() {
        let repo = InMemoryAgentRepository::new();
        repo.save(sample("coder")).await.unwrap();
        let result = repo.save(sample("coder")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_removes_both_indexes() {
        let repo = InMemoryAgentRepository::new();
        let agent = sample("coder");
        let id = agent.agent_id();
        repo.save(agent).await.unwrap();
        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.exists(id).await.unwrap());
        assert!(!repo.exists_by_name("coder").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_active_filters_inactive() {
        let repo = InMemoryAgentRepository::new();
        let mut agent = sample("idle");
        agent.is_active = false;
        repo.save(agent).await.unwrap();
        repo.save(sample("busy")).await.unwrap();
        let active = repo.find_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].agent_name(), "busy");
    }

    #[tokio::test]
    async fn test_clear() {
        let repo = InMemoryAgentRepository::new();
        repo.save(sample("coder")).await.unwrap();
        repo.clear().await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
