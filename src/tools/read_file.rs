//! Read file tool
//!
//! Allows an agent to read files from its sandboxed workspace directory.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;

use super::traits::Tool;
use crate::domain::{TaskOutcome, ToolParamType, ToolParameter};
use crate::error::Result;

pub struct ReadFileTool {
    allowed_dir: PathBuf,
}

impl ReadFileTool {
    pub fn new(allowed_dir: PathBuf) -> Self {
        ReadFileTool { allowed_dir }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read the contents of a file"
    }

    fn parameters(&self) -> Vec<ToolParameter> {
        vec![ToolParameter::required(
            "path",
            ToolParamType::String,
            "Path to the file to read, relative to the workspace",
        )]
    }

    fn category(&self) -> &str {
        "filesystem"
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<TaskOutcome> {
        let path = args
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| crate::Error::InvalidInput("missing 'path' parameter".to_string()))?;

        let full_path = self.allowed_dir.join(path);
        if !full_path.starts_with(&self.allowed_dir) {
            return Ok(TaskOutcome::Rejected("access denied: path outside workspace".to_string()));
        }

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(TaskOutcome::Text(content)),
            Err(e) => Ok(TaskOutcome::Rejected(format!("failed to read file: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_file_outside_workspace_rejected() {
        let tool = ReadFileTool::new(PathBuf::from("/tmp/workspace"));
        let mut args = Map::new();
        args.insert("path".into(), Value::String("../../etc/passwd".into()));
        let outcome = tool.execute(args).await.unwrap();
        assert!(matches!(outcome, TaskOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_read_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ReadFileTool::new(dir.path().to_path_buf());
        let mut args = Map::new();
        args.insert("path".into(), Value::String("nope.txt".into()));
        let outcome = tool.execute(args).await.unwrap();
        assert!(matches!(outcome, TaskOutcome::Rejected(_)));
    }
}
