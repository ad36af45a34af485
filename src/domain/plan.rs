//! Execution plans and the mutable todo-list state derived from them

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single step proposed by the planner, before execution begins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionStep {
    pub step_id: u32,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_capability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<u32>,
}

/// A decomposition of a request into ordered, dependency-linked steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub query: String,
    pub steps: Vec<ActionStep>,
}

impl ExecutionPlan {
    /// A plan with no decomposition: the whole query answered directly, no steps
    pub fn direct(query: impl Into<String>) -> Self {
        ExecutionPlan { query: query.into(), steps: Vec::new() }
    }

    pub fn is_direct(&self) -> bool {
        self.steps.is_empty()
    }
}

/// What a spawned agent is being asked to accomplish for one plan step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub objective: String,
    pub definition_of_done: String,
}

/// A finished plan step, kept around to render `## EXECUTION HISTORY`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedStep {
    pub step_id: u32,
    pub description: String,
    pub response: String,
}

/// Status of a single todo-list step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStepStatus {
    Pending,
    Completed,
}

/// A step as tracked by the state manager, carrying live status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoStep {
    pub step_id: u32,
    pub description: String,
    pub status: TodoStepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<u32>,
}

impl TodoStep {
    pub fn is_pending(&self) -> bool {
        matches!(self.status, TodoStepStatus::Pending)
    }
}

/// The live, mutable state of a decomposed request's progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoListState {
    pub query: String,
    pub steps: Vec<TodoStep>,
    pub completed_step_ids: Vec<u32>,
    pub step_results: HashMap<u32, String>,
}

impl TodoListState {
    /// Seed state from a freshly-built plan. Every step starts pending.
    pub fn from_plan(plan: &ExecutionPlan) -> Self {
        let steps = plan
            .steps
            .iter()
            .map(|s| TodoStep {
                step_id: s.step_id,
                description: s.description.clone(),
                status: TodoStepStatus::Pending,
                depends_on: s.depends_on,
            })
            .collect();
        TodoListState {
            query: plan.query.clone(),
            steps,
            completed_step_ids: Vec::new(),
            step_results: HashMap::new(),
        }
    }

    /// A todo list with zero steps is never considered complete
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| !s.is_pending())
    }

    /// Render a `✓`/`○` checklist, in step order
    pub fn display_todolist(&self) -> String {
        self.steps
            .iter()
            .map(|s| {
                let mark = if s.is_pending() { "○" } else { "✓" };
                format!("{mark} [{}] {}", s.step_id, s.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> ExecutionPlan {
        ExecutionPlan {
            query: "do the thing".into(),
            steps: vec![
                ActionStep { step_id: 1, description: "first".into(), required_capability: None, depends_on: None },
                ActionStep { step_id: 2, description: "second".into(), required_capability: None, depends_on: Some(1) },
            ],
        }
    }

    #[test]
    fn test_empty_todolist_never_complete() {
        let state = TodoListState { query: "q".into(), steps: vec![], completed_step_ids: vec![], step_results: HashMap::new() };
        assert!(!state.is_complete());
    }

    #[test]
    fn test_from_plan_all_pending() {
        let state = TodoListState::from_plan(&sample_plan());
        assert_eq!(state.steps.len(), 2);
        assert!(state.steps.iter().all(|s| s.is_pending()));
        assert!(!state.is_complete());
    }

    #[test]
    fn test_display_todolist_marks() {
        let mut state = TodoListState::from_plan(&sample_plan());
        state.steps[0].status = TodoStepStatus::Completed;
        let rendered = state.display_todolist();
        assert!(rendered.contains("✓ [1] first"));
        assert!(rendered.contains("○ [2] second"));
    }

    #[test]
    fn test_direct_plan_has_no_steps() {
        let plan = ExecutionPlan::direct("what is 2+2");
        assert!(plan.is_direct());
    }
}
