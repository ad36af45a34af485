//! Configuration validation

use super::types::Config;

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ConfigValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ConfigValidationResult {
    pub fn valid() -> Self {
        ConfigValidationResult { valid: true, errors: Vec::new(), warnings: Vec::new() }
    }

    pub fn with_error(mut self, issue: ValidationIssue) -> Self {
        self.valid = false;
        self.errors.push(issue);
        self
    }

    pub fn with_warning(mut self, issue: ValidationIssue) -> Self {
        self.warnings.push(issue);
        self
    }
}

/// A single validation finding
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue { path: path.into(), message: message.into(), suggestion: None }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Validate a loaded configuration
pub fn validate_config(config: &Config) -> ConfigValidationResult {
    let mut result = ConfigValidationResult::valid();
    result = validate_provider_config(config, result);
    result = validate_scheduler_config(config, result);
    result
}

fn validate_provider_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    use secrecy::ExposeSecret;
    if config.provider.openrouter.api_key.expose_secret().is_empty() {
        result = result.with_error(
            ValidationIssue::new("provider.openrouter.api_key", "no OpenRouter API key configured")
                .with_suggestion("set OPENAGENT_PROVIDER_API_KEY or provider.openrouter.api_key in the config file"),
        );
    }
    result
}

fn validate_scheduler_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    if config.scheduler.output_truncate_chars == 0 {
        result = result.with_warning(
            ValidationIssue::new("scheduler.output_truncate_chars", "truncation disabled at 0 chars")
                .with_suggestion("use a positive character limit, e.g. 4000"),
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config_has_no_api_key() {
        let config = Config::default();
        let result = validate_config(&config);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_validate_config_with_key_is_valid() {
        let mut config = Config::default();
        config.provider.openrouter.api_key = secrecy::SecretString::from("sk-test".to_string());
        let result = validate_config(&config);
        assert!(result.valid);
    }
}
