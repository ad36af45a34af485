//! Builds executable `Agent`s from a `RegisteredAgent` and shared collaborators
//!
//! Routing construction through the factory is what breaks the cyclic reference
//! between `TasksManager` and the agents it spawns: `TasksManager` never holds
//! an `Agent` directly, only a `RegisteredAgent` plus a factory handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::agent::client::LlmClient;
use crate::domain::{AgentCapabilities, RegisteredAgent};
use crate::tools::ToolScheduler;

/// A named bundle of `(system_prompt, authorized_tools, max_iterations)` that
/// `TasksManager` resolves by `ActionStep::required_capability`.
#[derive(Debug, Clone)]
pub struct CapabilityPreset {
    pub system_prompt: Option<String>,
    pub authorized_tools: Vec<String>,
    pub max_iterations: u32,
}

/// A `RegisteredAgent` wired up with the collaborators it needs to run
/// `TaskExecution::run`. Capability-as-data: there is no per-agent-type trait
/// hierarchy, only `AgentCapabilities` data on the registered identity.
pub struct Agent {
    pub registered: RegisteredAgent,
    pub scheduler: Arc<ToolScheduler>,
    pub llm: Arc<dyn LlmClient>,
}

/// Builds `Agent`s from `RegisteredAgent`s plus factory-held shared collaborators
pub struct AgentFactory {
    scheduler: Arc<ToolScheduler>,
    llm: Arc<dyn LlmClient>,
    capabilities: HashMap<String, CapabilityPreset>,
    /// Instances built by `create`, keyed by `agent_id` so repeated calls for
    /// the same registered identity reuse the same wiring instead of rebuilding it.
    agents: Mutex<HashMap<Uuid, Arc<Agent>>>,
}

impl AgentFactory {
    pub fn new(scheduler: Arc<ToolScheduler>, llm: Arc<dyn LlmClient>) -> Self {
        AgentFactory { scheduler, llm, capabilities: HashMap::new(), agents: Mutex::new(HashMap::new()) }
    }

    /// Declare a capability preset ahead of time, e.g. a `"coder"` capability
    /// authorized only for file/search tools.
    pub fn register_capability(
        &mut self,
        tag: impl Into<String>,
        system_prompt: Option<String>,
        authorized_tools: Vec<String>,
        max_iterations: u32,
    ) {
        self.capabilities.insert(tag.into(), CapabilityPreset { system_prompt, authorized_tools, max_iterations });
    }

    /// Wire up an `Agent` from an already-registered identity. Returns the
    /// cached instance for this `agent_id` unless `force_recreate` is set, in
    /// which case the cache entry is rebuilt and replaced.
    pub fn create(&self, registered: RegisteredAgent, force_recreate: bool) -> Arc<Agent> {
        let agent_id = registered.agent_id();
        if !force_recreate {
            if let Some(cached) = self.agents.lock().unwrap().get(&agent_id) {
                return Arc::clone(cached);
            }
        }
        let agent = Arc::new(Agent { registered, scheduler: Arc::clone(&self.scheduler), llm: Arc::clone(&self.llm) });
        self.agents.lock().unwrap().insert(agent_id, Arc::clone(&agent));
        agent
    }

    /// Drop a cached agent instance so the next `create` for this id rebuilds it.
    pub fn invalidate(&self, agent_id: Uuid) {
        self.agents.lock().unwrap().remove(&agent_id);
    }

    /// Build a fresh `RegisteredAgent` for a plan step's `required_capability` and
    /// wire it into an `Agent`. Falls back to an unrestricted capability preset
    /// with `default_max_iterations` when the tag has no registered preset.
    pub fn create_for_capability(&self, agent_name: impl Into<String>, capability_tag: Option<&str>, default_max_iterations: u32) -> Arc<Agent> {
        let preset = capability_tag.and_then(|tag| self.capabilities.get(tag));

        let capabilities = match preset {
            Some(p) => AgentCapabilities {
                capability_tags: capability_tag.map(|t| vec![t.to_string()]).unwrap_or_default(),
                authorized_tools: p.authorized_tools.clone(),
                max_iterations: p.max_iterations,
            },
            None => AgentCapabilities::unrestricted(default_max_iterations),
        };
        let system_prompt = preset.and_then(|p| p.system_prompt.clone());

        let registered = RegisteredAgent::new(agent_name, capabilities, system_prompt);
        self.create(registered, false)
    }
}
