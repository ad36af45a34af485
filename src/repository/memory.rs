//! In-memory conversation turn storage

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{ConversationContext, ConversationTurn};
use crate::error::{Error, Result};

use super::{AgentRepository, MemoryRepository};

/// Conversation history keyed by agent id, guarded by a single mutex
///
/// Every read clones its way out from under the lock, so callers never
/// hold a borrow that could block a concurrent writer.
pub struct InMemoryMemoryRepository {
    turns: Mutex<HashMap<Uuid, Vec<ConversationTurn>>>,
}

impl InMemoryMemoryRepository {
    pub fn new() -> Self {
        InMemoryMemoryRepository { turns: Mutex::new(HashMap::new()) }
    }
}

impl Default for InMemoryMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryRepository for InMemoryMemoryRepository {
    async fn save_turn(&self, agent_id: Uuid, turn: ConversationTurn) -> Result<()> {
        let mut turns = self.turns.lock().unwrap();
        turns.entry(agent_id).or_default().push(turn);
        Ok(())
    }

    async fn append_turns(&self, agent_id: Uuid, new_turns: Vec<ConversationTurn>) -> Result<()> {
        let mut turns = self.turns.lock().unwrap();
        turns.entry(agent_id).or_default().extend(new_turns);
        Ok(())
    }

    async fn get_conversation_history(&self, agent_id: Uuid, limit: Option<usize>) -> Result<Vec<ConversationTurn>> {
        let turns = self.turns.lock().unwrap();
        let history = turns.get(&agent_id).cloned().unwrap_or_default();
        match limit {
            Some(n) if history.len() > n => Ok(history[history.len() - n..].to_vec()),
            _ => Ok(history),
        }
    }

    async fn get_context(&self, agent_id: Uuid, agent_repo: &dyn AgentRepository) -> Result<ConversationContext> {
        let identity = agent_repo
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("agent {agent_id} is not registered")))?
            .identity;
        let conversation_history = self.get_conversation_history(agent_id, None).await?;
        Ok(ConversationContext {
            agent_identity: identity,
            conversation_history,
            context_metadata: serde_json::json!({}),
            created_at: Utc::now(),
        })
    }

    async fn clear_agent_memory(&self, agent_id: Uuid) -> Result<()> {
        let mut turns = self.turns.lock().unwrap();
        if let Some(v) = turns.get_mut(&agent_id) {
            v.clear();
        }
        Ok(())
    }

    async fn delete_agent_memory(&self, agent_id: Uuid) -> Result<()> {
        let mut turns = self.turns.lock().unwrap();
        turns.remove(&agent_id);
        Ok(())
    }

    async fn exists(&self, agent_id: Uuid) -> Result<bool> {
        let turns = self.turns.lock().unwrap();
        Ok(turns.contains_key(&agent_id))
    }

    async fn get_turn_count(&self, agent_id: Uuid) -> Result<usize> {
        let turns = self.turns.lock().unwrap();
        Ok(turns.get(&agent_id).map(|v| v.len()).unwrap_or(0))
    }

    async fn get_all_agent_ids(&self) -> Result<Vec<Uuid>> {
        let turns = self.turns.lock().unwrap();
        Ok(turns.keys().copied().collect())
    }

    async fn get_last_turn(&self, agent_id: Uuid) -> Result<Option<ConversationTurn>> {
        let turns = self.turns.lock().unwrap();
        Ok(turns.get(&agent_id).and_then(|v| v.last().cloned()))
    }

    async fn clear_all(&self) -> Result<()> {
        let mut turns = self.turns.lock().unwrap();
        turns.clear();
        Ok(())
    }
}
