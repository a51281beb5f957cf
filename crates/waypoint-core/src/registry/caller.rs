//! Runs registry tools as child processes.

use std::{process::Stdio, sync::Arc, time::Duration};

use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value, json};
use tokio::{io::AsyncWriteExt, process::Command, time};

use super::ToolRegistry;
use crate::{
    error::{EngineError, Result},
    models::ToolCallResult,
    services::ToolCaller,
};

/// Calls a tool by spawning `command args… <method>` in the manifest's
/// directory and writing the JSON arguments to its stdin.
#[derive(Debug, Clone)]
pub struct ProcessToolCaller {
    registry: Arc<ToolRegistry>,
}

impl ProcessToolCaller {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ToolCaller for ProcessToolCaller {
    async fn call(
        &self,
        tool: &str,
        method: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallResult> {
        let manifest = self
            .registry
            .get(tool)
            .ok_or_else(|| EngineError::ToolNotFound {
                tool: tool.to_string(),
            })?;
        let call_error = |message: String| EngineError::ToolCall {
            tool: tool.to_string(),
            message,
        };
        if manifest.method(method).is_none() {
            return Err(call_error(format!("unknown method '{method}'")));
        }

        let mut command = Command::new(&manifest.command);
        command
            .args(&manifest.args)
            .arg(method)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if !manifest.dir.as_os_str().is_empty() {
            command.current_dir(&manifest.dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| call_error(format!("failed to spawn '{}': {e}", manifest.command)))?;

        let payload = serde_json::to_vec(&Value::Object(arguments))?;
        let stdin = child.stdin.take();
        let exchange = async move {
            if let Some(mut stdin) = stdin
                && let Err(e) = stdin.write_all(&payload).await
                && e.kind() != std::io::ErrorKind::BrokenPipe
            {
                return Err(format!("failed to write arguments: {e}"));
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| format!("failed to collect output: {e}"))
        };

        let timeout = Duration::from_millis(manifest.timeout_ms);
        let output = time::timeout(timeout, exchange)
            .await
            .map_err(|_| call_error(format!("timed out after {}ms", manifest.timeout_ms)))?
            .map_err(call_error)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!("{tool}.{method} exited with {}", output.status);

        if !output.status.success() {
            return Ok(ToolCallResult::new(json!({
                "status": "failure",
                "exit_code": output.status.code(),
                "stderr": stderr,
            })));
        }

        let mut result = ToolCallResult::new(parse_stdout(&stdout));
        if !stderr.is_empty() {
            result.auxiliary = Some(json!({ "stderr": stderr }));
        }
        Ok(result)
    }
}

/// Tool stdout as JSON, or as a plain string when it is not JSON.
pub fn parse_stdout(stdout: &str) -> Value {
    let trimmed = stdout.trim();
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}
