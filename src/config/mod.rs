//! Configuration - layered loading, validation, and path resolution
//!
//! - `types`: `Config` and its sections (`AgentConfig`, `provider::ProviderConfig`,
//!   `SchedulerConfig`, `MemoryConfig`)
//! - `io`: loading from an explicit path, a config file, or environment variables
//! - `validation`: post-load sanity checks
//! - `paths`: XDG-respecting path resolution

mod io;
mod paths;
pub mod types;
mod validation;

pub use types::{AgentConfig, Config, MemoryConfig, SchedulerConfig};
pub use types::provider::{OpenRouterConfig, ProviderConfig};

pub use io::{load_config, load_config_from_env, load_config_from_path, save_config, ConfigSnapshot};
pub use paths::{config_dir, config_path, ensure_dir, state_dir, workspace_dir};
pub use validation::{validate_config, ConfigValidationResult, ValidationIssue};
