//! Configuration loading and saving
//!
//! Precedence: explicit path argument > config file at the default location >
//! environment variables > built-in defaults.

use std::path::Path;

use super::types::Config;
use crate::error::{Error, Result};

/// A snapshot of a configuration file, used by CLI config-inspection commands
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub path: std::path::PathBuf,
    pub exists: bool,
    pub raw: Option<String>,
    pub config: Option<Config>,
    pub issues: Vec<String>,
}

/// Load configuration, trying an explicit path, then the default config file,
/// then falling back to environment variables and defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config_from_path(path);
    }

    let default_path = super::paths::config_path();
    if default_path.exists() {
        load_config_from_path(&default_path)
    } else {
        load_config_from_env()
    }
}

/// Parse a config file, detecting TOML vs JSON5 by extension
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read config file {}: {e}", path.display())))?;

    let config: Config = if path.extension().map_or(false, |ext| ext == "toml") {
        toml::from_str(&content).map_err(|e| Error::Config(format!("invalid TOML config: {e}")))?
    } else if path.extension().map_or(false, |ext| ext == "json") {
        json5::from_str(&content).map_err(|e| Error::Config(format!("invalid JSON config: {e}")))?
    } else {
        json5::from_str(&content)
            .or_else(|_| toml::from_str(&content).map_err(|e| Error::Config(e.to_string())))
            .map_err(|e| Error::Config(format!("failed to parse config: {e}")))?
    };

    Ok(config)
}

/// Build a config from environment variables and built-in defaults
pub fn load_config_from_env() -> Result<Config> {
    use secrecy::SecretString;

    dotenvy::dotenv().ok();

    let mut config = Config::default();

    if let Ok(api_key) = std::env::var("OPENAGENT_PROVIDER_API_KEY") {
        config.provider.openrouter.api_key = SecretString::from(api_key);
    }
    if let Ok(model) = std::env::var("OPENAGENT_PROVIDER_MODEL") {
        config.provider.openrouter.default_model = model;
    }
    if let Ok(base_url) = std::env::var("OPENAGENT_PROVIDER_BASE_URL") {
        config.provider.openrouter.base_url = base_url;
    }
    if let Ok(timeout) = std::env::var("OPENAGENT_PROVIDER_TIMEOUT_SECS") {
        if let Ok(timeout) = timeout.parse() {
            config.provider.openrouter.timeout_secs = timeout;
        }
    }
    if let Ok(retries) = std::env::var("OPENAGENT_PROVIDER_MAX_RETRIES") {
        if let Ok(retries) = retries.parse() {
            config.provider.openrouter.max_retries = retries;
        }
    }

    if let Ok(model) = std::env::var("OPENAGENT_AGENT_MODEL") {
        config.agent.model = model;
    }
    if let Ok(max_iterations) = std::env::var("OPENAGENT_AGENT_MAX_ITERATIONS") {
        if let Ok(n) = max_iterations.parse() {
            config.agent.max_iterations = n;
        }
    }
    if let Ok(workspace) = std::env::var("OPENAGENT_WORKSPACE") {
        config.agent.workspace = std::path::PathBuf::from(workspace);
    }

    if let Ok(truncate) = std::env::var("OPENAGENT_SCHEDULER_OUTPUT_TRUNCATE_CHARS") {
        if let Ok(n) = truncate.parse() {
            config.scheduler.output_truncate_chars = n;
        }
    }

    if let Ok(capacity) = std::env::var("OPENAGENT_MEMORY_LRU_CACHE_CAPACITY") {
        if let Ok(n) = capacity.parse() {
            config.memory.lru_cache_capacity = n;
        }
    }

    Ok(config)
}

/// Serialize a config back to disk, TOML or JSON by extension
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = if path.extension().map_or(false, |ext| ext == "toml") {
        toml::to_string_pretty(config).map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?
    } else {
        serde_json::to_string_pretty(config).map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Read a config file into a snapshot, used by CLI diagnostics
pub fn read_config_snapshot(path: &Path) -> ConfigSnapshot {
    if !path.exists() {
        return ConfigSnapshot {
            path: path.to_path_buf(),
            exists: false,
            raw: None,
            config: None,
            issues: vec!["configuration file does not exist".to_string()],
        };
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return ConfigSnapshot {
                path: path.to_path_buf(),
                exists: true,
                raw: None,
                config: None,
                issues: vec![format!("failed to read file: {e}")],
            };
        }
    };

    match load_config_from_path(path) {
        Ok(config) => ConfigSnapshot { path: path.to_path_buf(), exists: true, raw: Some(raw), config: Some(config), issues: Vec::new() },
        Err(e) => ConfigSnapshot {
            path: path.to_path_buf(),
            exists: true,
            raw: Some(raw),
            config: None,
            issues: vec![format!("failed to parse config: {e}")],
        },
    }
}
