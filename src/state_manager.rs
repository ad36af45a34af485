//! Owns the live, mutable todo list for one `TasksManager::execute` run

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{AgentOutput, ExecutionPlan, TodoListState, TodoStep, TodoStepStatus};
use crate::error::{Error, Result};

/// Matches a `todo_update: {...}` patch embedded anywhere in an agent's
/// response, `.` matching newlines so a multi-line JSON blob is captured whole.
fn todo_update_pattern() -> Regex {
    Regex::new(r"(?s)todo_update:\s*(\{.*\})").unwrap()
}

#[derive(Debug, Deserialize)]
struct TodoPatch {
    #[serde(default)]
    add: Vec<TodoPatchAdd>,
    #[serde(default)]
    remove: Vec<u32>,
    #[serde(default)]
    modify: Vec<TodoPatchModify>,
}

#[derive(Debug, Deserialize)]
struct TodoPatchAdd {
    step_id: u32,
    description: String,
    #[serde(default)]
    depends_on: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TodoPatchModify {
    step_id: u32,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<TodoStepStatus>,
}

/// Drives one `TodoListState` through a plan's execution: seeding, handing out
/// the next runnable step, and applying `todo_update:` patches mid-run.
pub struct StateManager {
    state: TodoListState,
}

impl StateManager {
    /// Validate and seed state from a freshly-built plan
    pub fn init_todolist(plan: &ExecutionPlan) -> Result<Self> {
        if plan.steps.is_empty() {
            return Err(Error::InvalidInput("plan has no steps to track".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for step in &plan.steps {
            if let Some(dep) = step.depends_on {
                if !seen.contains(&dep) {
                    return Err(Error::InvalidInput(format!(
                        "step {} depends on {dep}, which does not appear earlier in the plan",
                        step.step_id
                    )));
                }
            }
            seen.insert(step.step_id);
        }
        Ok(StateManager { state: TodoListState::from_plan(plan) })
    }

    /// The first pending step whose dependency (if any) is already completed.
    /// Steps whose dependency isn't met yet are skipped, not a hard stop.
    pub fn get_next_step(&self) -> Option<&TodoStep> {
        self.state.steps.iter().find(|step| {
            step.is_pending() && step.depends_on.map_or(true, |dep| self.state.completed_step_ids.contains(&dep))
        })
    }

    /// Record a step's result, mark it completed on success, and apply any
    /// `todo_update:` patch embedded in the response.
    pub fn update_from_result(&mut self, step_id: u32, result: &AgentOutput) {
        self.state.step_results.insert(step_id, result.response.clone());

        if result.success {
            if let Some(step) = self.state.steps.iter_mut().find(|s| s.step_id == step_id) {
                step.status = TodoStepStatus::Completed;
            }
            if !self.state.completed_step_ids.contains(&step_id) {
                self.state.completed_step_ids.push(step_id);
            }
        }

        self.apply_todo_update(&result.response);
    }

    fn apply_todo_update(&mut self, response: &str) {
        let Some(captures) = todo_update_pattern().captures(response) else { return };
        let Some(patch_str) = captures.get(1) else { return };
        let Ok(value) = serde_json::from_str::<Value>(patch_str.as_str()) else { return };
        let Ok(patch) = serde_json::from_value::<TodoPatch>(value) else { return };

        for add in patch.add {
            if !self.state.steps.iter().any(|s| s.step_id == add.step_id) {
                self.state.steps.push(TodoStep {
                    step_id: add.step_id,
                    description: add.description,
                    status: TodoStepStatus::Pending,
                    depends_on: add.depends_on,
                });
            }
        }
        for step_id in patch.remove {
            self.state.steps.retain(|s| s.step_id != step_id);
        }
        for modify in patch.modify {
            if let Some(step) = self.state.steps.iter_mut().find(|s| s.step_id == modify.step_id) {
                if let Some(description) = modify.description {
                    step.description = description;
                }
                if let Some(status) = modify.status {
                    step.status = status;
                }
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn get_step_results(&self) -> std::collections::HashMap<u32, String> {
        self.state.step_results.clone()
    }

    pub fn get_todolist(&self) -> Vec<TodoStep> {
        self.state.steps.clone()
    }

    pub fn get_state(&self) -> TodoListState {
        self.state.clone()
    }

    pub fn get_completed_steps(&self) -> Vec<u32> {
        self.state.completed_step_ids.clone()
    }

    pub fn display_todolist(&self) -> String {
        self.state.display_todolist()
    }
}
