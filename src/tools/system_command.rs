//! System command execution tool
//!
//! Runs an OS command and reports stdout/stderr/exit code. Dangerous-command
//! gating lives in `ToolScheduler`, not here: this tool just executes.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;

use super::traits::Tool;
use crate::domain::{TaskOutcome, ToolParamType, ToolParameter};
use crate::error::Result;

pub struct SystemCommandTool {
    working_dir: Option<PathBuf>,
    timeout_secs: u64,
}

impl Default for SystemCommandTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCommandTool {
    pub fn new() -> Self {
        SystemCommandTool { working_dir: None, timeout_secs: 60 }
    }

    pub fn with_working_dir(working_dir: PathBuf) -> Self {
        SystemCommandTool { working_dir: Some(working_dir), timeout_secs: 60 }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[async_trait]
impl Tool for SystemCommandTool {
    fn name(&self) -> &str {
        "system_command"
    }

    fn description(&self) -> &str {
        "Execute a system/shell command on the OS. Returns stdout, stderr, and exit code."
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            ToolParameter::required("command", ToolParamType::String, "The command to execute"),
            ToolParameter::optional("args", ToolParamType::Array, "Arguments to pass to the command", Value::Array(vec![])),
            ToolParameter::optional(
                "working_dir",
                ToolParamType::String,
                "Optional working directory override",
                Value::Null,
            ),
        ]
    }

    fn category(&self) -> &str {
        "shell"
    }

    fn dangerous(&self) -> bool {
        true
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<TaskOutcome> {
        let command = args
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| crate::Error::InvalidInput("missing 'command' parameter".to_string()))?;

        let cmd_args: Vec<String> = args
            .get("args")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default();

        let working_dir = args
            .get("working_dir")
            .and_then(|v| v.as_str())
            .map(PathBuf::from)
            .or_else(|| self.working_dir.clone());

        let mut cmd = Command::new(command);
        cmd.args(&cmd_args);
        if let Some(ref dir) = working_dir {
            cmd.current_dir(dir);
        }

        let timeout = Duration::from_secs(self.timeout_secs);
        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                let exit_code = output.status.code().unwrap_or(-1);

                let mut content = String::new();
                if !stdout.is_empty() {
                    content.push_str("STDOUT:\n");
                    content.push_str(&stdout);
                }
                if !stderr.is_empty() {
                    if !content.is_empty() {
                        content.push('\n');
                    }
                    content.push_str("STDERR:\n");
                    content.push_str(&stderr);
                }
                if content.is_empty() {
                    content = format!("command completed with exit code {exit_code}");
                }

                if output.status.success() {
                    Ok(TaskOutcome::Text(content))
                } else {
                    Ok(TaskOutcome::Rejected(format!("command exited with code {exit_code}: {content}")))
                }
            }
            Ok(Err(e)) => Ok(TaskOutcome::Rejected(format!("failed to execute command '{command}': {e}"))),
            Err(_) => Ok(TaskOutcome::Rejected(format!("command '{command}' timed out after {} seconds", self.timeout_secs))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: Vec<(&str, Value)>) -> Map<String, Value> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[tokio::test]
    async fn test_system_command_echo() {
        let tool = SystemCommandTool::new();
        let result = tool
            .execute(args(vec![
                ("command", Value::String("echo".into())),
                ("args", Value::Array(vec![Value::String("hello".into()), Value::String("world".into())])),
            ]))
            .await
            .unwrap();
        match result {
            TaskOutcome::Text(s) => assert!(s.contains("hello world")),
            other => panic!("expected text outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_system_command_not_found() {
        let tool = SystemCommandTool::new();
        let result = tool.execute(args(vec![("command", Value::String("nonexistent_command_xyz".into()))])).await.unwrap();
        assert!(matches!(result, TaskOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_system_command_with_working_dir() {
        let tool = SystemCommandTool::with_working_dir(PathBuf::from("/tmp"));
        let result = tool.execute(args(vec![("command", Value::String("pwd".into()))])).await.unwrap();
        match result {
            TaskOutcome::Text(s) => assert!(s.contains("/tmp")),
            other => panic!("expected text outcome, got {other:?}"),
        }
    }
}
