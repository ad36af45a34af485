//! Write file tool
//!
//! Allows an agent to write/create files in its sandboxed workspace directory.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::traits::Tool;
use crate::domain::{TaskOutcome, ToolParamType, ToolParameter};
use crate::error::Result;

pub struct WriteFileTool {
    allowed_dir: PathBuf,
}

impl WriteFileTool {
    pub fn new(allowed_dir: PathBuf) -> Self {
        WriteFileTool { allowed_dir }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file"
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![
            ToolParameter::required("path", ToolParamType::String, "Path to the file to write, relative to the workspace"),
            ToolParameter::required("content", ToolParamType::String, "Content to write to the file"),
        ]
    }

    fn category(&self) -> &str {
        "filesystem"
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<TaskOutcome> {
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| crate::Error::InvalidInput("missing 'path' parameter".to_string()))?;
        let content = args
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| crate::Error::InvalidInput("missing 'content' parameter".to_string()))?;

        let full_path = self.allowed_dir.join(path);
        if !full_path.starts_with(&self.allowed_dir) {
            return Ok(TaskOutcome::Rejected("access denied: path outside workspace".to_string()));
        }

        if let Some(parent) = full_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return Ok(TaskOutcome::Rejected(format!("failed to create directories: {e}")));
            }
        }

        match tokio::fs::write(&full_path, content).await {
            Ok(()) => Ok(TaskOutcome::Text(format!("wrote {} bytes to {}", content.len(), path))),
            Err(e) => Ok(TaskOutcome::Rejected(format!("failed to write file: {e}"))),
        }
    }
}
