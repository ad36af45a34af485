//! Assembles the message list handed to the LLM client for one reasoning-loop turn

use crate::agent::types::Message;
use crate::domain::{CompletedStep, ConversationContext, TaskAssignment, ToolMetadata};

const DEFAULT_SYSTEM_PROMPT: &str = "You are an autonomous agent. On each turn, respond with \
exactly one JSON tool invocation: `{\"tool_name\": \"...\", \"arguments\": {...}}`. Call \
`task_success` with a `response` argument when this step is complete, or `task_error` with \
a `reason` argument if it cannot be completed. If your response also completes the entire \
multi-step workflow and no further steps are needed, call `tasks_completed` with a `response` \
argument instead of `task_success` to stop the remaining plan.";

/// Renders the tool catalog and task context into the message list for one LLM call
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the full message list: system prompt, global/assignment/history block, then
    /// the agent's own accumulated turns from the current task execution.
    pub fn build(
        context: &ConversationContext,
        assignment: &TaskAssignment,
        tool_catalog: &[ToolMetadata],
        history: &[CompletedStep],
        system_prompt: Option<&str>,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(context.conversation_history.len() + 2);

        let system_prompt = system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT);
        messages.push(Message::system(format!(
            "{system_prompt}\n\n## Available Tools\n{}",
            Self::render_catalog(tool_catalog)
        )));

        messages.push(Message::user(Self::render_task_block(context, assignment, history)));

        for turn in &context.conversation_history {
            messages.push(Message { role: turn.role.clone(), content: turn.content.clone() });
        }

        messages
    }

    fn render_catalog(tool_catalog: &[ToolMetadata]) -> String {
        if tool_catalog.is_empty() {
            return "(no tools registered)".to_string();
        }
        tool_catalog
            .iter()
            .map(|tool| {
                let params = tool
                    .parameters
                    .iter()
                    .map(|p| format!("{}: {:?}{}", p.name, p.param_type, if p.required { " (required)" } else { "" }))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("- `{}` — {}\n  params: {}", tool.name, tool.description, params)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_task_block(context: &ConversationContext, assignment: &TaskAssignment, history: &[CompletedStep]) -> String {
        let mut block = String::new();
        block.push_str("# GLOBAL CONTEXT\n");
        block.push_str(&format!("agent: {}\n", context.agent_identity.agent_name));

        block.push_str("\n# CURRENT ASSIGNMENT\n");
        block.push_str("## OBJECTIVE\n");
        block.push_str(&assignment.objective);
        block.push_str("\n\n## DEFINITION OF DONE\n");
        block.push_str(&assignment.definition_of_done);

        if !history.is_empty() {
            block.push_str("\n\n## EXECUTION HISTORY\n");
            for step in history {
                block.push_str(&format!("### STEP {} {}\n", step.step_id, step.response));
            }
        }

        block
    }
}
