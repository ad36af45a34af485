//! # OpenAgent
//!
//! An autonomous multi-agent task orchestrator built with Rust.
//!
//! A request comes in as a single query string. `TasksManager` asks a
//! planning LLM call whether the request needs decomposition into a
//! dependency-ordered plan; if it does, `StateManager` walks the plan one
//! runnable step at a time, spawning a fresh `Agent` per step through
//! `AgentFactory`. Each agent runs `TaskExecution`'s reasoning loop: build a
//! prompt from its accumulated conversation (`PromptBuilder`,
//! `ContextManager`, `MemoryManager`), ask the LLM for exactly one JSON tool
//! call, dispatch it through `ToolScheduler`, and repeat until it calls
//! `task_success` or `task_error`, or exhausts its iteration budget.
//!
//! ## Architecture
//!
//! - **Domain** (`domain`): Core data model — agent identity, conversation
//!   turns, tool contracts, plans and their live todo-list state.
//! - **Repository** (`repository`): Persistence traits for agents and
//!   conversation memory, with in-memory implementations.
//! - **Memory** (`memory_manager`, `context_manager`): An LRU-cached facade
//!   over conversation memory, and the builder that merges it with agent
//!   identity into a `ConversationContext`.
//! - **Tools** (`tools`): The tool trait, built-in tools, the registry, and
//!   the scheduler that authorizes, coerces, and truncates tool calls.
//! - **Agent** (`agent`): The LLM client trait and its OpenRouter backend,
//!   the agent factory, and the per-agent reasoning loop.
//! - **Prompt building** (`prompt_builder`): Renders tool catalog and task
//!   context into the message list handed to the LLM.
//! - **Orchestration** (`state_manager`, `tasks_manager`, `orchestrator`):
//!   Plan state, planning-then-execution, and the top-level composition root.
//! - **Configuration** (`config`): Layered loading (file, environment),
//!   validation, and path resolution.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use openagent::config::load_config;
//! use openagent::{Orchestrator, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_config(None)?;
//!     let orchestrator = Orchestrator::new(config)?;
//!     let output = orchestrator.handle_request("summarize README.md").await?;
//!     println!("{}", output.response);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod context_manager;
pub mod domain;
pub mod error;
pub mod memory_manager;
pub mod orchestrator;
pub mod prompt_builder;
pub mod repository;
pub mod state_manager;
pub mod tasks_manager;
pub mod tools;

pub use error::{Error, Result};
pub use orchestrator::Orchestrator;

pub use domain::{
    AgentCapabilities, AgentIdentity, AgentOutput, ConversationContext, ConversationTurn,
    RegisteredAgent, Role, ToolCall, ToolMetadata, ToolResult,
};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
