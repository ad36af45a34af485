//! Top-level composition root: owns the repositories, tool registry and LLM
//! client, and exposes a single `handle_request` entry point.

use std::sync::Arc;

use crate::agent::{AgentFactory, LlmClient, OpenRouterLlmClient};
use crate::config::{ensure_dir, Config};
use crate::domain::AgentOutput;
use crate::error::Result;
use crate::memory_manager::MemoryManager;
use crate::repository::{AgentRepository, InMemoryAgentRepository, InMemoryMemoryRepository};
use crate::tasks_manager::TasksManager;
use crate::tools::{ReadFileTool, SystemCommandTool, ToolRegistry, ToolScheduler, WriteFileTool};

/// Wires together the default in-memory repositories, the built-in tool set,
/// and an OpenRouter-backed LLM client behind one `TasksManager`.
pub struct Orchestrator {
    tasks_manager: TasksManager,
    agent_repo: Arc<dyn AgentRepository>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Result<Self> {
        ensure_dir(&config.agent.workspace)?;

        let mut registry = ToolRegistry::new();
        registry.register(ReadFileTool::new(config.agent.workspace.clone()));
        registry.register(WriteFileTool::new(config.agent.workspace.clone()));
        registry.register(SystemCommandTool::with_working_dir(config.agent.workspace.clone()));

        let scheduler = Arc::new(ToolScheduler::with_config(
            registry,
            config.scheduler.output_truncate_chars,
            config.scheduler.dangerous_command_confirmation,
        ));

        let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterLlmClient::new(config.provider.openrouter.clone())?);
        let factory = Arc::new(AgentFactory::new(Arc::clone(&scheduler), Arc::clone(&llm)));

        let memory_repo = Arc::new(InMemoryMemoryRepository::new());
        let memory = Arc::new(MemoryManager::with_capacity(memory_repo, config.memory.lru_cache_capacity));
        let agent_repo: Arc<dyn AgentRepository> = Arc::new(InMemoryAgentRepository::new());

        let tasks_manager =
            TasksManager::new(factory, memory, Arc::clone(&agent_repo), llm, config.agent.max_iterations);

        Ok(Orchestrator { tasks_manager, agent_repo })
    }

    /// Build a custom-wired orchestrator, e.g. with a `MockLlmClient` for tests
    pub fn with_tasks_manager(tasks_manager: TasksManager, agent_repo: Arc<dyn AgentRepository>) -> Self {
        Orchestrator { tasks_manager, agent_repo }
    }

    pub async fn handle_request(&self, query: &str) -> Result<AgentOutput> {
        self.tasks_manager.execute(query).await
    }

    pub fn agent_repository(&self) -> &dyn AgentRepository {
        self.agent_repo.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockLlmClient;
    use crate::repository::InMemoryMemoryRepository as MemRepo;

    #[tokio::test]
    async fn test_handle_request_direct_answer() {
        let scheduler = Arc::new(ToolScheduler::new(ToolRegistry::new()));
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(vec![
            r#"{"steps": []}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "pong"}}"#,
        ]));
        let factory = Arc::new(AgentFactory::new(scheduler, Arc::clone(&llm)));
        let memory = Arc::new(MemoryManager::new(Arc::new(MemRepo::new())));
        let agent_repo: Arc<dyn AgentRepository> = Arc::new(InMemoryAgentRepository::new());
        let tasks_manager = TasksManager::new(factory, memory, Arc::clone(&agent_repo), llm, 5);
        let orchestrator = Orchestrator::with_tasks_manager(tasks_manager, agent_repo);

        let output = orchestrator.handle_request("ping").await.unwrap();
        assert!(output.success);
        assert_eq!(output.response, "pong");
    }
}
