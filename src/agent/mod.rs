//! LLM client, wire types, and the per-agent reasoning loop
//!
//! `AgentFactory` builds executable `Agent`s from `RegisteredAgent` identities
//! (see `crate::domain`) plus the shared tool scheduler and LLM client.
//! `TaskExecution` drives one agent's reasoning loop to completion.

mod client;
mod factory;
mod task_execution;
pub(crate) mod types;

pub use client::{LlmClient, MockLlmClient, OpenRouterLlmClient};
pub use factory::{Agent, AgentFactory, CapabilityPreset};
pub use task_execution::{extract_json_value, parse_tool_call, TaskExecution};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, GenerationOptions, Message};
