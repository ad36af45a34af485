//! Safety-gated dispatch layer in front of a `ToolRegistry`

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::{AgentCapabilities, TaskOutcome, ToolCall, ToolParamType, ToolResult};

use super::registry::ToolRegistry;

/// Tool names the dangerous-command gate applies to
const SHELL_TOOL_NAMES: &[&str] = &["system_command", "bash", "execute_command"];

const DEFAULT_TRUNCATE_CHARS: usize = 4000;

/// Wraps a `ToolRegistry` with authorization, coercion, dangerous-command
/// gating and output truncation. Never aborts a batch: every call resolves
/// to a `ToolResult`, success or failure.
pub struct ToolScheduler {
    registry: ToolRegistry,
    output_truncate_chars: usize,
    dangerous_command_confirmation: bool,
    dangerous_re: Regex,
}

impl ToolScheduler {
    pub fn new(registry: ToolRegistry) -> Self {
        Self::with_config(registry, DEFAULT_TRUNCATE_CHARS, true)
    }

    pub fn with_config(registry: ToolRegistry, output_truncate_chars: usize, dangerous_command_confirmation: bool) -> Self {
        ToolScheduler {
            registry,
            output_truncate_chars,
            dangerous_command_confirmation,
            // anchored on word boundaries so `rename_file.sh` is not a false
            // positive while `rm -rf /` and `del *.txt` are caught
            dangerous_re: Regex::new(r"\b(rm|del|rmdir|mv|rename)\b").unwrap(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub async fn execute(&self, capabilities: &AgentCapabilities, call: ToolCall) -> ToolResult {
        if !capabilities.allows_tool(&call.tool_name) {
            return ToolResult::rejected(format!(
                "agent is not authorized to call tool '{}'",
                call.tool_name
            ));
        }

        let metadata = match self.registry.metadata_for(&call.tool_name) {
            Some(m) => m,
            None => return self.registry.execute(&call).await,
        };

        let mut arguments = call.arguments.clone();
        for param in &metadata.parameters {
            match arguments.get(&param.name).cloned() {
                Some(value) => match coerce(&value, param.param_type) {
                    Some(coerced) => {
                        arguments.insert(param.name.clone(), coerced);
                    }
                    None if param.required => {
                        return ToolResult::rejected(format!(
                            "parameter '{}' could not be coerced to {:?}",
                            param.name, param.param_type
                        ));
                    }
                    None => {
                        if let Some(default) = &param.default {
                            arguments.insert(param.name.clone(), default.clone());
                        }
                    }
                },
                None if param.required => {
                    return ToolResult::rejected(format!("missing required parameter '{}'", param.name));
                }
                None => {
                    if let Some(default) = &param.default {
                        arguments.insert(param.name.clone(), default.clone());
                    }
                }
            }
        }

        let is_dangerous_tool = metadata.dangerous || SHELL_TOOL_NAMES.contains(&call.tool_name.as_str());
        if self.dangerous_command_confirmation && is_dangerous_tool {
            if let Some(reason) = self.dangerous_command_reason(&arguments) {
                return ToolResult::rejected(format!("confirmation required: {reason}"));
            }
        }

        let gated_call = ToolCall { tool_name: call.tool_name, arguments };
        let mut result = self.registry.execute(&gated_call).await;
        self.truncate_in_place(&mut result);
        result
    }

    fn dangerous_command_reason(&self, arguments: &Map<String, Value>) -> Option<String> {
        let mut full = String::new();
        if let Some(cmd) = arguments.get("command").and_then(|v| v.as_str()) {
            full.push_str(cmd);
        }
        if let Some(args) = arguments.get("args").and_then(|v| v.as_array()) {
            for a in args {
                if let Some(s) = a.as_str() {
                    full.push(' ');
                    full.push_str(s);
                }
            }
        }
        self.dangerous_re.find(&full).map(|m| format!("'{}' matches a destructive command pattern", m.as_str()))
    }

    fn truncate_in_place(&self, result: &mut ToolResult) {
        if !result.success {
            return;
        }
        if let TaskOutcome::Text(text) = &result.outcome {
            if text.chars().count() > self.output_truncate_chars {
                let total = text.chars().count();
                let truncated: String = text.chars().take(self.output_truncate_chars).collect();
                result.outcome = TaskOutcome::Text(format!(
                    "{truncated}... [Output truncated. Total length: {total} chars]"
                ));
            }
        }
    }
}

/// Best-effort coercion of a JSON value into the declared parameter type.
/// Returns `None` when no reasonable coercion exists.
fn coerce(value: &Value, param_type: ToolParamType) -> Option<Value> {
    let matches_already = match (&value, param_type) {
        (Value::String(_), ToolParamType::String) => true,
        (Value::Number(_), ToolParamType::Integer) | (Value::Number(_), ToolParamType::Float) => true,
        (Value::Bool(_), ToolParamType::Boolean) => true,
        (Value::Array(_), ToolParamType::Array) => true,
        (Value::Object(_), ToolParamType::Object) => true,
        _ => false,
    };
    if matches_already {
        return Some(value.clone());
    }

    match param_type {
        ToolParamType::Integer | ToolParamType::Float => {
            if let Value::String(s) = value {
                s.trim().parse::<f64>().ok().map(|n| {
                    serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
                })
            } else {
                None
            }
        }
        ToolParamType::Boolean => {
            if let Value::String(s) = value {
                match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    _ => None,
                }
            } else {
                None
            }
        }
        ToolParamType::Array => Some(Value::Array(vec![value.clone()])),
        ToolParamType::String => Some(Value::String(value.to_string())),
        ToolParamType::Object => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToolParameter;
    use async_trait::async_trait;

    struct GreetTool;

    #[async_trait]
    impl super::super::traits::Tool for GreetTool {
        fn name(&self) -> &str {
            "greet"
        }
        fn description(&self) -> &str {
            "greets someone"
        }
        fn parameters(&self) -> Vec<ToolParameter> {
            vec![
                ToolParameter::required("name", ToolParamType::String, "who to greet"),
                ToolParameter::optional("loud", ToolParamType::Boolean, "shout it", Value::Bool(false)),
            ]
        }
        async fn execute(&self, args: Map<String, Value>) -> crate::error::Result<TaskOutcome> {
            let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("");
            let loud = args.get("loud").and_then(|v| v.as_bool()).unwrap_or(false);
            let text = if loud { format!("HELLO {}!", name.to_uppercase()) } else { format!("hello {name}") };
            Ok(TaskOutcome::Text(text))
        }
    }

    fn scheduler() -> ToolScheduler {
        let mut registry = ToolRegistry::new();
        registry.register(GreetTool);
        ToolScheduler::new(registry)
    }

    #[tokio::test]
    async fn test_default_injection() {
        let sched = scheduler();
        let caps = AgentCapabilities::unrestricted(5);
        let mut args = Map::new();
        args.insert("name".into(), Value::String("ada".into()));
        let result = sched.execute(&caps, ToolCall { tool_name: "greet".into(), arguments: args }).await;
        assert!(result.success);
        assert_eq!(result.outcome.as_display_text(), "hello ada");
    }

    #[tokio::test]
    async fn test_type_coercion_string_to_bool() {
        let sched = scheduler();
        let caps = AgentCapabilities::unrestricted(5);
        let mut args = Map::new();
        args.insert("name".into(), Value::String("ada".into()));
        args.insert("loud".into(), Value::String("true".into()));
        let result = sched.execute(&caps, ToolCall { tool_name: "greet".into(), arguments: args }).await;
        assert!(result.success);
        assert_eq!(result.outcome.as_display_text(), "HELLO ADA!");
    }

    #[tokio::test]
    async fn test_missing_required_parameter_rejected() {
        let sched = scheduler();
        let caps = AgentCapabilities::unrestricted(5);
        let result = sched.execute(&caps, ToolCall { tool_name: "greet".into(), arguments: Map::new() }).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_authorization_gating() {
        let sched = scheduler();
        let mut caps = AgentCapabilities::unrestricted(5);
        caps.authorized_tools = vec!["other_tool".into()];
        let mut args = Map::new();
        args.insert("name".into(), Value::String("ada".into()));
        let result = sched.execute(&caps, ToolCall { tool_name: "greet".into(), arguments: args }).await;
        assert!(!result.success);
        assert!(matches!(result.outcome, TaskOutcome::Rejected(_)));
    }

    #[test]
    fn test_dangerous_command_detection() {
        let sched = scheduler();
        let mut args = Map::new();
        args.insert("command".into(), Value::String("rm".into()));
        args.insert("args".into(), Value::Array(vec![Value::String("-rf".into()), Value::String("/".into())]));
        assert!(sched.dangerous_command_reason(&args).is_some());
    }

    #[test]
    fn test_dangerous_command_not_a_false_positive() {
        let sched = scheduler();
        let mut args = Map::new();
        args.insert("command".into(), Value::String("rename_file.sh".into()));
        assert!(sched.dangerous_command_reason(&args).is_none());
    }

    #[test]
    fn test_output_truncation() {
        let sched = scheduler();
        let mut result = ToolResult::success(TaskOutcome::Text("x".repeat(5000)));
        sched.truncate_in_place(&mut result);
        let text = result.outcome.as_display_text();
        assert!(text.ends_with("... [Output truncated. Total length: 5000 chars]"));
    }
}
