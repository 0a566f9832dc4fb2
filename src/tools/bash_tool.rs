//! Bash tool: confirmed shell command execution with bounded capture.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::{Tool, ToolResult};
use crate::constants::{
    BASH_DRAIN_GRACE, BASH_MAX_OUTPUT_SIZE, BASH_READ_CHUNK_SIZE, BASH_SHELL, BASH_SKIPPED,
    BASH_SPAWN_FAILED, BASH_TRUNCATION_MARKER,
};
use crate::permissions::Confirm;

/// Tool that runs a shell command after the human approves it.
///
/// stderr is folded into stdout, so the model sees one interleaved stream.
/// Capture stops once more than `BASH_MAX_OUTPUT_SIZE` bytes have been
/// read; the chunk that crossed the limit is kept whole. Once the shell
/// exits, output is drained until the pipe goes quiet for
/// `BASH_DRAIN_GRACE`, so a background job holding stdout open does not
/// block the turn.
pub struct BashTool {
    confirm: Arc<dyn Confirm>,
    shell: String,
}

impl BashTool {
    pub fn new(confirm: Arc<dyn Confirm>) -> Self {
        Self::with_shell(confirm, BASH_SHELL)
    }

    /// Uses `shell` instead of `bash` to interpret commands.
    pub fn with_shell(confirm: Arc<dyn Confirm>, shell: impl Into<String>) -> Self {
        Self {
            confirm,
            shell: shell.into(),
        }
    }

    /// Confirms, runs and captures `command`. Never fails: every problem
    /// is reported in the returned text.
    pub async fn run(&self, command: &str) -> ToolResult {
        match self.confirm.confirm(command) {
            Ok(true) => {}
            Ok(false) => return ToolResult::new(BASH_SKIPPED),
            Err(e) => {
                tracing::warn!("confirmation failed: {e:#}");
                return ToolResult::new(BASH_SKIPPED);
            }
        }

        let mut child = match Command::new(&self.shell)
            .arg("-c")
            .arg(format!("exec 2>&1\n{command}"))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(shell = %self.shell, "spawn failed: {e}");
                return ToolResult::new(BASH_SPAWN_FAILED);
            }
        };

        let Some(mut stdout) = child.stdout.take() else {
            return ToolResult::new(BASH_SPAWN_FAILED);
        };

        let mut captured = Vec::new();
        let mut chunk = vec![0u8; BASH_READ_CHUNK_SIZE];
        let mut truncated = false;
        let mut exit: Option<i32> = None;
        loop {
            let read = match exit {
                // The shell is gone; background jobs may still hold the pipe.
                Some(_) => match timeout(BASH_DRAIN_GRACE, stdout.read(&mut chunk)).await {
                    Ok(read) => read,
                    Err(_) => {
                        tracing::debug!("output still open after exit, stopping capture");
                        break;
                    }
                },
                None => tokio::select! {
                    read = stdout.read(&mut chunk) => read,
                    status = child.wait() => {
                        exit = Some(wait_code(status));
                        continue;
                    }
                },
            };
            match read {
                Ok(0) => break,
                Ok(n) => {
                    captured.extend_from_slice(&chunk[..n]);
                    if captured.len() > BASH_MAX_OUTPUT_SIZE {
                        truncated = true;
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("reading command output failed: {e}");
                    break;
                }
            }
        }
        drop(stdout);

        let mut output = String::from_utf8_lossy(&captured).into_owned();
        if truncated {
            if exit.is_none() {
                // Reaps the child as well as killing it.
                if let Err(e) = child.kill().await {
                    tracing::debug!("kill after truncation failed: {e}");
                }
            }
            output.push_str(BASH_TRUNCATION_MARKER);
            return ToolResult {
                output,
                truncated: true,
            };
        }

        let code = match exit {
            Some(code) => code,
            None => wait_code(child.wait().await),
        };
        output.push_str(&format!("\n[exit code: {code}]"));
        ToolResult::new(output)
    }
}

fn wait_code(status: std::io::Result<ExitStatus>) -> i32 {
    match status {
        Ok(status) => exit_code(status),
        Err(e) => {
            tracing::warn!("waiting for command failed: {e}");
            -1
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[derive(Deserialize)]
struct BashInput {
    command: String,
}

#[async_trait::async_trait]
impl Tool for BashTool {
    fn name(&self) -> &str {
        "bash"
    }

    fn description(&self) -> &str {
        "Execute a bash command and return its combined stdout and stderr along with \
         the exit code. The user is asked to approve every command before it runs."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The bash command to execute"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let input: BashInput =
            serde_json::from_value(input).context("bash expects {\"command\": string}")?;
        Ok(self.run(&input.command).await)
    }
}
