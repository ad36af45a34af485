//! Output of a single agent's reasoning-loop run

use serde::{Deserialize, Serialize};

/// The result of running `TaskExecution::run` to completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutput {
    pub response: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Set by the `tasks_completed` control tool: tells `TasksManager::execute_plan`
    /// to stop running the remaining plan steps, distinct from this step's own
    /// success/failure (which `task_success`/`task_error` already convey).
    #[serde(default)]
    pub halt_workflow: bool,
}

impl AgentOutput {
    pub fn success(response: impl Into<String>, agent_id: impl Into<String>) -> Self {
        AgentOutput { response: response.into(), success: true, error: None, agent_id: Some(agent_id.into()), halt_workflow: false }
    }

    pub fn failure(error_code: impl Into<String>, agent_id: impl Into<String>) -> Self {
        AgentOutput {
            response: String::new(),
            success: false,
            error: Some(error_code.into()),
            agent_id: Some(agent_id.into()),
            halt_workflow: false,
        }
    }

    /// Built from the `tasks_completed` control tool: a step-level success
    /// that also signals the whole workflow to stop early.
    pub fn halt(response: impl Into<String>, agent_id: impl Into<String>) -> Self {
        AgentOutput { response: response.into(), success: true, error: None, agent_id: Some(agent_id.into()), halt_workflow: true }
    }

    /// Whether this output counts as a planning failure: unsuccessful, or
    /// a "successful" response so long it would wedge into the next prompt.
    pub fn is_planning_failure(&self) -> bool {
        !self.success || self.response.len() > 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_success_counts_as_planning_failure() {
        let output = AgentOutput::success("x".repeat(1001), "agent-1");
        assert!(output.is_planning_failure());
    }

    #[test]
    fn test_normal_success_is_not_a_planning_failure() {
        let output = AgentOutput::success("done", "agent-1");
        assert!(!output.is_planning_failure());
    }

    #[test]
    fn test_halt_is_a_success_that_requests_workflow_stop() {
        let output = AgentOutput::halt("all done", "agent-1");
        assert!(output.success);
        assert!(output.halt_workflow);
        assert!(!output.is_planning_failure());
    }

    #[test]
    fn test_plain_success_does_not_halt_the_workflow() {
        let output = AgentOutput::success("step done", "agent-1");
        assert!(!output.halt_workflow);
    }
}
