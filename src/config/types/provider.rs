//! LLM provider configuration

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Provider-level configuration. OpenRouter is the only supported backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub openrouter: OpenRouterConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig { openrouter: OpenRouterConfig::default() }
    }
}

fn default_secret() -> SecretString {
    SecretString::from(String::new())
}

/// Connection details for the OpenRouter-compatible chat completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    #[serde(skip_serializing, default = "default_secret")]
    pub api_key: SecretString,
    #[serde(default = "default_openrouter_model")]
    pub default_model: String,
    #[serde(default = "default_openrouter_url")]
    pub base_url: String,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        OpenRouterConfig {
            api_key: default_secret(),
            default_model: default_openrouter_model(),
            base_url: default_openrouter_url(),
            site_url: None,
            site_name: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_openrouter_model() -> String {
    "anthropic/claude-sonnet-4".to_string()
}

fn default_openrouter_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_default_model() {
        let config = ProviderConfig::default();
        assert_eq!(config.openrouter.default_model, "anthropic/claude-sonnet-4");
        assert_eq!(config.openrouter.base_url, "https://openrouter.ai/api/v1");
    }
}
