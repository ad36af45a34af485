//! Configuration types

pub mod provider;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub provider: provider::ProviderConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            agent: AgentConfig::default(),
            provider: provider::ProviderConfig::default(),
            scheduler: SchedulerConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and, if present, a config file
    pub fn from_env() -> crate::error::Result<Self> {
        crate::config::load_config(None)
    }
}

/// Agent-level defaults applied to newly registered agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_max_context")]
    pub max_context_tokens: u32,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            model: default_model(),
            workspace: default_workspace(),
            max_iterations: default_max_iterations(),
            max_context_tokens: default_max_context(),
            verbose: false,
        }
    }
}

fn default_model() -> String {
    "anthropic/claude-sonnet-4".to_string()
}

fn default_workspace() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".openagent").join("workspace"))
        .unwrap_or_else(|| PathBuf::from("./workspace"))
}

fn default_max_iterations() -> u32 {
    10
}

fn default_max_context() -> u32 {
    200_000
}

/// `ToolScheduler` defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_truncate_chars")]
    pub output_truncate_chars: usize,
    #[serde(default = "default_true")]
    pub dangerous_command_confirmation: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            output_truncate_chars: default_truncate_chars(),
            dangerous_command_confirmation: true,
        }
    }
}

fn default_truncate_chars() -> usize {
    4000
}

fn default_true() -> bool {
    true
}

/// `MemoryManager` defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Maximum turns retained per agent. `None` means unbounded.
    #[serde(default)]
    pub max_turns_per_agent: Option<usize>,
    #[serde(default = "default_cache_capacity")]
    pub lru_cache_capacity: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig { max_turns_per_agent: Some(500), lru_cache_capacity: default_cache_capacity() }
    }
}

fn default_cache_capacity() -> u64 {
    128
}
