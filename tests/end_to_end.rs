//! End-to-end scenarios driving `Orchestrator`/`TasksManager` against
//! `MockLlmClient`-scripted transcripts.

use std::sync::Arc;

use openagent::agent::{AgentFactory, LlmClient, MockLlmClient};
use openagent::repository::{AgentRepository, InMemoryAgentRepository, InMemoryMemoryRepository};
use openagent::tasks_manager::TasksManager;
use openagent::{memory_manager::MemoryManager, Orchestrator};
use openagent::tools::{SystemCommandTool, ToolRegistry, ToolScheduler};

fn orchestrator_with(scheduler: Arc<ToolScheduler>, responses: Vec<&str>) -> Orchestrator {
    let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(responses));
    let factory = Arc::new(AgentFactory::new(scheduler, Arc::clone(&llm)));
    let memory = Arc::new(MemoryManager::new(Arc::new(InMemoryMemoryRepository::new())));
    let agent_repo: Arc<dyn AgentRepository> = Arc::new(InMemoryAgentRepository::new());
    let tasks_manager = TasksManager::new(factory, memory, Arc::clone(&agent_repo), llm, 6);
    Orchestrator::with_tasks_manager(tasks_manager, agent_repo)
}

fn empty_scheduler() -> Arc<ToolScheduler> {
    Arc::new(ToolScheduler::new(ToolRegistry::new()))
}

/// Single-step direct answer, no tools.
#[tokio::test]
async fn direct_answer_no_tools() {
    let orchestrator = orchestrator_with(
        empty_scheduler(),
        vec![
            r#"{"steps": []}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "Paris"}}"#,
        ],
    );

    let output = orchestrator.handle_request("what is the capital of France?").await.unwrap();
    assert!(output.success);
    assert_eq!(output.response, "Paris");
}

/// Multi-step plan, all steps succeed in order.
#[tokio::test]
async fn multi_step_plan_all_succeed_in_order() {
    let orchestrator = orchestrator_with(
        empty_scheduler(),
        vec![
            r#"{"steps": [
                {"step_id": 1, "description": "draft the outline"},
                {"step_id": 2, "description": "write the sections", "depends_on": 1},
                {"step_id": 3, "description": "proofread", "depends_on": 2}
            ]}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "outline drafted"}}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "sections written"}}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "proofread complete"}}"#,
        ],
    );

    let output = orchestrator.handle_request("write a report").await.unwrap();
    assert!(output.success);
    assert_eq!(output.response, "proofread complete");
}

/// A step's agent exhausts its JSON-recovery retry budget parsing
/// malformed tool calls; the plan aborts with `task_{n}_failed`.
#[tokio::test]
async fn json_retry_exhaustion_aborts_plan() {
    let orchestrator = orchestrator_with(
        empty_scheduler(),
        vec![
            r#"{"steps": [{"step_id": 1, "description": "do the thing"}]}"#,
            "I'm not sure how to format this.",
            "Let me try again, here's some prose.",
            "Still not JSON, sorry.",
            "One more attempt, also not valid.",
        ],
    );

    let output = orchestrator.handle_request("do something tricky").await.unwrap();
    assert!(!output.success);
    assert!(output.error.unwrap().contains("task_1_failed"));
}

/// A step emits a `todo_update:` patch adding a new step, picked up by
/// the next `get_next_step` call.
#[tokio::test]
async fn todo_update_patch_adds_a_step() {
    let orchestrator = orchestrator_with(
        empty_scheduler(),
        vec![
            r#"{"steps": [{"step_id": 1, "description": "start the migration"}]}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "migration started. todo_update: {\"add\": [{\"step_id\": 2, \"description\": \"verify the migration\"}]}"}}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "migration verified"}}"#,
        ],
    );

    let output = orchestrator.handle_request("migrate the database").await.unwrap();
    assert!(output.success);
    assert_eq!(output.response, "migration verified");
}

/// A dangerous `system_command` call is rejected and the agent recovers
/// by choosing a different tool.
#[tokio::test]
async fn dangerous_command_rejected_then_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = ToolRegistry::new();
    registry.register(SystemCommandTool::with_working_dir(dir.path().to_path_buf()));
    let scheduler = Arc::new(ToolScheduler::with_config(registry, 4000, true));

    let orchestrator = orchestrator_with(
        scheduler,
        vec![
            r#"{"steps": []}"#,
            r#"{"tool_name": "system_command", "arguments": {"command": "rm", "args": ["-rf", "everything"]}}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "used a safer approach instead"}}"#,
        ],
    );

    let output = orchestrator.handle_request("clean up the workspace").await.unwrap();
    assert!(output.success);
    assert_eq!(output.response, "used a safer approach instead");
}

/// A step is skipped while its dependency is unmet in favor of a later
/// runnable step, and the plan still finishes once the dependency resolves.
#[tokio::test]
async fn dependency_skip_then_completion() {
    let orchestrator = orchestrator_with(
        empty_scheduler(),
        vec![
            r#"{"steps": [
                {"step_id": 1, "description": "provision the server"},
                {"step_id": 3, "description": "update the changelog"},
                {"step_id": 2, "description": "deploy the build", "depends_on": 1}
            ]}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "server provisioned"}}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "changelog updated"}}"#,
            r#"{"tool_name": "task_success", "arguments": {"response": "build deployed"}}"#,
        ],
    );

    let output = orchestrator.handle_request("ship the release").await.unwrap();
    assert!(output.success);
    assert_eq!(output.response, "build deployed");
}

/// Task 1 of a 3-task plan emits `tasks_completed`; tasks 2 and 3 never run
/// and the overall result is still a success.
#[tokio::test]
async fn tasks_completed_short_circuits_remaining_steps() {
    let orchestrator = orchestrator_with(
        empty_scheduler(),
        vec![
            r#"{"steps": [
                {"step_id": 1, "description": "check for an existing fix"},
                {"step_id": 2, "description": "apply the fix"},
                {"step_id": 3, "description": "notify the team", "depends_on": 2}
            ]}"#,
            r#"{"tool_name": "tasks_completed", "arguments": {"response": "already fixed upstream, nothing more to do"}}"#,
        ],
    );

    let output = orchestrator.handle_request("fix the broken build").await.unwrap();
    assert!(output.success);
    assert_eq!(output.response, "already fixed upstream, nothing more to do");
}
