//! Shell command tool.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::debug;

use valet_core::tool::Tool;
use valet_types::tool::{ToolError, ToolSpec};

const INSTRUCTION: &str = "\
# CLI:
- Run a CLI command on the host system.
- Commands should NOT run in batch; issue one run_cli call at a time.
- Do not delete system files or directories.
";

#[derive(Debug, Deserialize, JsonSchema)]
struct RunCliParams {
    /// The command to execute, e.g. "git status".
    command: String,
}

/// Runs a shell command and returns its stdout.
pub struct RunCli {
    spec: ToolSpec,
}

impl RunCli {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec {
                name: "run_cli".to_string(),
                instruction: INSTRUCTION.to_string(),
                parameters: serde_json::to_value(schemars::schema_for!(RunCliParams))
                    .unwrap_or_default(),
            },
        }
    }
}

impl Default for RunCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for RunCli {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: RunCliParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::new(format!("invalid arguments: {e}")))?;

        debug!(command = %params.command, "running shell command");
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&params.command)
            .output()
            .await
            .map_err(|e| ToolError::new(format!("failed to spawn command: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolError::new(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(serde_json::Value::String(stdout))
    }
}
