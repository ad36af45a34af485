//! Decomposes a request into a dependency-ordered plan and drives it to completion

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::error;

use crate::agent::{extract_json_value, AgentFactory, GenerationOptions, LlmClient, Message, TaskExecution};
use crate::domain::{AgentOutput, CompletedStep, ExecutionPlan, TaskAssignment};
use crate::error::{Error, Result};
use crate::memory_manager::MemoryManager;
use crate::repository::AgentRepository;
use crate::state_manager::StateManager;

const PLANNING_SYSTEM_PROMPT: &str = "You plan work for autonomous agents. Given a request, decide \
whether it needs decomposition into multiple dependency-ordered steps. Respond with exactly one \
JSON object: either `{\"steps\": [{\"step_id\": 1, \"description\": \"...\", \"required_capability\": \
null, \"depends_on\": null}, ...]}` for a multi-step plan, or `{\"steps\": []}` if the request can be \
answered directly by a single agent.";

#[derive(Debug, Deserialize)]
struct PlanResponse {
    #[serde(default)]
    steps: Vec<PlannedStep>,
}

#[derive(Debug, Deserialize)]
struct PlannedStep {
    step_id: u32,
    description: String,
    #[serde(default)]
    required_capability: Option<String>,
    #[serde(default)]
    depends_on: Option<u32>,
}

/// Planning-then-execution entry point: decomposes a request (or answers it
/// directly) and drives every resulting step through `TaskExecution`.
pub struct TasksManager {
    factory: Arc<AgentFactory>,
    memory: Arc<MemoryManager>,
    agent_repo: Arc<dyn AgentRepository>,
    planner_llm: Arc<dyn LlmClient>,
    default_max_iterations: u32,
}

impl TasksManager {
    pub fn new(
        factory: Arc<AgentFactory>,
        memory: Arc<MemoryManager>,
        agent_repo: Arc<dyn AgentRepository>,
        planner_llm: Arc<dyn LlmClient>,
        default_max_iterations: u32,
    ) -> Self {
        TasksManager { factory, memory, agent_repo, planner_llm, default_max_iterations }
    }

    pub async fn execute(&self, query: &str) -> Result<AgentOutput> {
        let plan = self.plan_for(query).await?;

        if plan.is_direct() {
            let agent = self.factory.create_for_capability("direct-agent", None, self.default_max_iterations);
            let assignment = TaskAssignment {
                objective: query.to_string(),
                definition_of_done: "answer the user's request directly and call task_success".to_string(),
            };
            return TaskExecution::run(&agent, assignment, &self.memory, self.agent_repo.as_ref(), &[]).await;
        }

        self.execute_plan(plan).await
    }

    /// Ask the planner LLM whether this request needs decomposition. Any
    /// parse failure or an empty step list falls back to a direct plan.
    async fn plan_for(&self, query: &str) -> Result<ExecutionPlan> {
        let messages = vec![Message::system(PLANNING_SYSTEM_PROMPT), Message::user(query.to_string())];
        let raw = self.planner_llm.complete(messages, GenerationOptions::precise()).await?;

        let Some(value) = extract_json_value(&raw) else {
            return Ok(ExecutionPlan::direct(query));
        };
        let Ok(parsed) = serde_json::from_value::<PlanResponse>(value) else {
            return Ok(ExecutionPlan::direct(query));
        };
        if parsed.steps.is_empty() {
            return Ok(ExecutionPlan::direct(query));
        }

        let steps = parsed
            .steps
            .into_iter()
            .map(|s| crate::domain::ActionStep {
                step_id: s.step_id,
                description: s.description,
                required_capability: s.required_capability,
                depends_on: s.depends_on,
            })
            .collect();
        Ok(ExecutionPlan { query: query.to_string(), steps })
    }

    async fn execute_plan(&self, plan: ExecutionPlan) -> Result<AgentOutput> {
        let capability_by_step: HashMap<u32, Option<String>> =
            plan.steps.iter().map(|s| (s.step_id, s.required_capability.clone())).collect();

        let mut state = StateManager::init_todolist(&plan)?;
        let mut history: Vec<CompletedStep> = Vec::new();
        let mut last_output: Option<AgentOutput> = None;

        while let Some(next) = state.get_next_step().cloned() {
            let capability = capability_by_step.get(&next.step_id).cloned().flatten();
            let agent = self.factory.create_for_capability(
                format!("step-{}", next.step_id),
                capability.as_deref(),
                self.default_max_iterations,
            );
            let assignment = TaskAssignment {
                objective: next.description.clone(),
                definition_of_done: "complete this step and call task_success with the result".to_string(),
            };

            let result = TaskExecution::run(&agent, assignment, &self.memory, self.agent_repo.as_ref(), &history).await?;
            state.update_from_result(next.step_id, &result);

            if result.is_planning_failure() {
                error!(step = next.step_id, "plan aborted");
                return Ok(AgentOutput::failure(Error::TaskFailed { step: next.step_id, reason: result.response }.to_string(), result.agent_id.unwrap_or_default()));
            }

            let halt = result.halt_workflow;
            history.push(CompletedStep { step_id: next.step_id, description: next.description, response: result.response.clone() });
            last_output = Some(result);

            if halt {
                break;
            }
        }

        last_output.ok_or_else(|| Error::Internal("plan produced no runnable steps".to_string()))
    }
}
