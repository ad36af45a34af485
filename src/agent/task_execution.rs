//! Per-agent reasoning loop: build prompt, call the LLM, parse one tool call,
//! dispatch it, observe, repeat until a control tool ends the run.

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::agent::factory::Agent;
use crate::agent::types::GenerationOptions;
use crate::context_manager::ContextManager;
use crate::domain::{AgentOutput, CompletedStep, ConversationTurn, Role, TaskAssignment, ToolCall};
use crate::error::{Error, Result};
use crate::memory_manager::MemoryManager;
use crate::prompt_builder::PromptBuilder;
use crate::repository::AgentRepository;

/// The tool names that terminate a reasoning loop instead of being
/// dispatched to the scheduler. `task_success`/`task_error` end only this
/// step; `tasks_completed` also tells the calling `TasksManager` to stop
/// running the remaining plan steps.
const CONTROL_TASK_SUCCESS: &str = "task_success";
const CONTROL_TASK_ERROR: &str = "task_error";
const CONTROL_TASKS_COMPLETED: &str = "tasks_completed";

/// Consecutive JSON-parse failures tolerated before the run aborts, distinct
/// from the overall `max_iterations` budget.
const MAX_JSON_RETRIES: u32 = 3;

pub struct TaskExecution;

impl TaskExecution {
    /// Run one agent's reasoning loop to completion against `assignment`.
    /// `history` is the execution history of already-completed plan steps,
    /// rendered into the prompt's `## EXECUTION HISTORY` block.
    pub async fn run(
        agent: &Agent,
        assignment: TaskAssignment,
        memory: &MemoryManager,
        agent_repo: &dyn AgentRepository,
        history: &[CompletedStep],
    ) -> Result<AgentOutput> {
        let agent_id = agent.registered.agent_id();
        agent_repo.save(agent.registered.clone()).await?;
        let mut json_retries = 0u32;

        for iteration in 0..agent.registered.capabilities.max_iterations {
            let context = ContextManager::build_context(agent_id, memory, agent_repo).await?;
            let catalog = agent.scheduler.registry().catalog();
            let messages = PromptBuilder::build(&context, &assignment, &catalog, history, agent.registered.system_prompt.as_deref());

            let raw = agent.llm.complete(messages, GenerationOptions::default()).await?;
            if raw.trim().is_empty() {
                return Ok(AgentOutput::failure(Error::EmptyLlmResponse.to_string(), agent_id.to_string()));
            }

            memory.save_turn(agent_id, ConversationTurn::new(Role::Assistant, raw.clone(), None)).await?;

            let call = match parse_tool_call(&raw) {
                Some(call) => call,
                None => {
                    json_retries += 1;
                    debug!(%agent_id, iteration, json_retries, "failed to parse a tool call out of the response");
                    if json_retries > MAX_JSON_RETRIES {
                        return Ok(AgentOutput::failure(Error::MaxRetriesExceeded.to_string(), agent_id.to_string()));
                    }
                    memory
                        .save_turn(
                            agent_id,
                            ConversationTurn::new(
                                Role::User,
                                "Respond with exactly one valid JSON tool call.".to_string(),
                                Some(json!({"cmd": "json_error"})),
                            ),
                        )
                        .await?;
                    continue;
                }
            };
            json_retries = 0;

            debug!(%agent_id, iteration, tool = %call.tool_name, "parsed tool call");

            match call.tool_name.as_str() {
                CONTROL_TASK_SUCCESS => {
                    let response = call.arguments.get("response").and_then(Value::as_str).unwrap_or_default();
                    return Ok(AgentOutput::success(response, agent_id.to_string()));
                }
                CONTROL_TASK_ERROR => {
                    let reason = call.arguments.get("reason").and_then(Value::as_str).unwrap_or_default();
                    return Ok(AgentOutput {
                        response: String::new(),
                        success: false,
                        error: Some(Error::AgentDeclaredError(reason.to_string()).to_string()),
                        agent_id: Some(agent_id.to_string()),
                        halt_workflow: false,
                    });
                }
                CONTROL_TASKS_COMPLETED => {
                    let response = call.arguments.get("response").and_then(Value::as_str).unwrap_or_default();
                    return Ok(AgentOutput::halt(response, agent_id.to_string()));
                }
                _ => {}
            }

            let result = agent.scheduler.execute(&agent.registered.capabilities, call).await;
            if !result.success {
                warn!(%agent_id, iteration, "tool call rejected: {}", result.outcome.as_display_text());
            }
            let metadata = result.cmd.as_ref().map(|cmd| json!({"cmd": cmd}));
            memory.save_turn(agent_id, ConversationTurn::new(Role::Tool, result.outcome.as_display_text(), metadata)).await?;
        }

        Ok(AgentOutput::failure(Error::MaxIterationsReached.to_string(), agent_id.to_string()))
    }
}

/// Two-phase recovery parser: strip fences, locate the outermost JSON object,
/// accept either a direct `{"tool_name", "arguments"}` shape or an
/// OpenAI-style `{"function": {"name", "arguments"}}` shape. `arguments` may
/// itself be a JSON-encoded string, parsed a second time.
pub fn parse_tool_call(raw: &str) -> Option<ToolCall> {
    let value = extract_json_value(raw)?;

    if let Some(tool_name) = value.get("tool_name").and_then(Value::as_str) {
        let arguments = extract_arguments(value.get("arguments"));
        return Some(ToolCall { tool_name: tool_name.to_string(), arguments });
    }

    if let Some(function) = value.get("function") {
        let tool_name = function.get("name").and_then(Value::as_str)?;
        let arguments = extract_arguments(function.get("arguments"));
        return Some(ToolCall { tool_name: tool_name.to_string(), arguments });
    }

    None
}

/// Strip fences and parse the outermost JSON object out of raw LLM text,
/// independent of any particular tool-call shape.
pub fn extract_json_value(raw: &str) -> Option<Value> {
    let stripped = strip_code_fences(raw);
    let object_str = extract_outermost_object(&stripped)?;
    serde_json::from_str(object_str).ok()
}

fn extract_arguments(arguments: Option<&Value>) -> Map<String, Value> {
    match arguments {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        let rest = rest.trim_start_matches('\n');
        if let Some(end) = rest.rfind("```") {
            return rest[..end].trim().to_string();
        }
        return rest.trim().to_string();
    }
    trimmed.to_string()
}

fn extract_outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direct_tool_call() {
        let raw = r#"{"tool_name": "read_file", "arguments": {"path": "a.txt"}}"#;
        let call = parse_tool_call(raw).unwrap();
        assert_eq!(call.tool_name, "read_file");
        assert_eq!(call.arguments.get("path").unwrap(), "a.txt");
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let raw = "```json\n{\"tool_name\": \"task_success\", \"arguments\": {\"response\": \"done\"}}\n```";
        let call = parse_tool_call(raw).unwrap();
        assert_eq!(call.tool_name, "task_success");
    }

    #[test]
    fn test_parse_openai_function_shape_with_string_arguments() {
        let raw = r#"{"function": {"name": "greet", "arguments": "{\"name\": \"ada\"}"}}"#;
        let call = parse_tool_call(raw).unwrap();
        assert_eq!(call.tool_name, "greet");
        assert_eq!(call.arguments.get("name").unwrap(), "ada");
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert!(parse_tool_call("not json at all").is_none());
    }

    #[test]
    fn test_parse_ignores_prose_around_the_object() {
        let raw = "Sure, here's my call:\n{\"tool_name\": \"read_file\", \"arguments\": {\"path\": \"x\"}}\nlet me know!";
        let call = parse_tool_call(raw).unwrap();
        assert_eq!(call.tool_name, "read_file");
    }

    #[tokio::test]
    async fn test_run_self_registers_agent_without_prior_save() {
        use crate::agent::client::MockLlmClient;
        use crate::agent::factory::AgentFactory;
        use crate::repository::{InMemoryAgentRepository, InMemoryMemoryRepository};
        use crate::tools::{ToolRegistry, ToolScheduler};
        use std::sync::Arc;

        let scheduler = Arc::new(ToolScheduler::new(ToolRegistry::new()));
        let llm = Arc::new(MockLlmClient::new(vec![
            r#"{"tool_name": "task_success", "arguments": {"response": "done"}}"#,
        ]));
        let factory = AgentFactory::new(scheduler, llm);
        let agent = factory.create_for_capability("solo-agent", None, 5);

        let memory = MemoryManager::new(Arc::new(InMemoryMemoryRepository::new()));
        let agent_repo = InMemoryAgentRepository::new();
        let assignment = TaskAssignment { objective: "say done".into(), definition_of_done: "respond".into() };

        // The factory never persists the agent it builds; `run` must do so
        // itself, since `ContextManager` requires the agent to already be
        // registered before it can build a context for it.
        let output = TaskExecution::run(&agent, assignment, &memory, &agent_repo, &[]).await.unwrap();
        assert!(output.success);
        assert_eq!(output.response, "done");
    }

    #[tokio::test]
    async fn test_tasks_completed_halts_with_success() {
        use crate::agent::client::MockLlmClient;
        use crate::agent::factory::AgentFactory;
        use crate::repository::{InMemoryAgentRepository, InMemoryMemoryRepository};
        use crate::tools::{ToolRegistry, ToolScheduler};
        use std::sync::Arc;

        let scheduler = Arc::new(ToolScheduler::new(ToolRegistry::new()));
        let llm = Arc::new(MockLlmClient::new(vec![
            r#"{"tool_name": "tasks_completed", "arguments": {"response": "workflow finished early"}}"#,
        ]));
        let factory = AgentFactory::new(scheduler, llm);
        let agent = factory.create_for_capability("halting-agent", None, 5);

        let memory = MemoryManager::new(Arc::new(InMemoryMemoryRepository::new()));
        let agent_repo = InMemoryAgentRepository::new();
        let assignment = TaskAssignment { objective: "stop the plan".into(), definition_of_done: "halt".into() };

        let output = TaskExecution::run(&agent, assignment, &memory, &agent_repo, &[]).await.unwrap();
        assert!(output.success);
        assert!(output.halt_workflow);
        assert_eq!(output.response, "workflow finished early");
    }
}
