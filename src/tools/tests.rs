use super::*;
use crate::constants::{BASH_MAX_OUTPUT_SIZE, BASH_SKIPPED, BASH_SPAWN_FAILED};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Answers every prompt the same way and counts how often it was asked.
struct FixedAnswer {
    approve: bool,
    asked: AtomicUsize,
}

impl FixedAnswer {
    fn new(approve: bool) -> Arc<Self> {
        Arc::new(Self {
            approve,
            asked: AtomicUsize::new(0),
        })
    }
}

impl Confirm for FixedAnswer {
    fn confirm(&self, _command: &str) -> Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.approve)
    }
}

#[test]
fn test_registry_with_builtins() {
    let registry = ToolRegistry::with_builtins(FixedAnswer::new(true));
    assert_eq!(registry.len(), 1);
    assert!(!registry.is_empty());
    let defs = registry.definitions();
    assert_eq!(defs[0]["type"], "function");
    assert_eq!(defs[0]["function"]["name"], "bash");
    assert_eq!(
        defs[0]["function"]["parameters"]["properties"]["command"]["type"],
        "string"
    );
    assert_eq!(defs[0]["function"]["parameters"]["required"], json!(["command"]));
}

#[tokio::test]
async fn test_unknown_tool() {
    let registry = ToolRegistry::with_builtins(FixedAnswer::new(true));
    let err = registry.execute("python", json!({})).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown tool: python");
}

#[tokio::test]
async fn test_bash_missing_command_arg() {
    let registry = ToolRegistry::with_builtins(FixedAnswer::new(true));
    assert!(registry.execute("bash", json!({"cmd": "ls"})).await.is_err());
}

#[tokio::test]
async fn test_bash_echo_with_exit_code() {
    let confirm = FixedAnswer::new(true);
    let registry = ToolRegistry::with_builtins(confirm.clone());
    let result = registry
        .execute("bash", json!({"command": "echo hello"}))
        .await
        .unwrap();
    assert_eq!(result.output, "hello\n\n[exit code: 0]");
    assert!(!result.truncated);
    assert_eq!(confirm.asked.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bash_nonzero_exit_and_stderr_merged() {
    let tool = BashTool::new(FixedAnswer::new(true));
    let result = tool.run("echo out; echo err 1>&2; exit 3").await;
    assert!(result.output.contains("out\n"));
    assert!(result.output.contains("err\n"));
    assert!(result.output.ends_with("\n[exit code: 3]"));
}

#[tokio::test]
async fn test_bash_declined_is_skipped() {
    let confirm = FixedAnswer::new(false);
    let tool = BashTool::new(confirm.clone());
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let result = tool.run(&format!("touch {}", marker.display())).await;
    assert_eq!(result.output, BASH_SKIPPED);
    assert!(!marker.exists());
    assert_eq!(confirm.asked.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bash_output_is_truncated() {
    let tool = BashTool::new(FixedAnswer::new(true));
    let result = tool.run("yes parley").await;
    assert!(result.truncated);
    assert!(result.output.ends_with("\n... [truncated at 100KB]"));
    assert!(!result.output.contains("[exit code:"));
    let captured = result.output.len() - "\n... [truncated at 100KB]".len();
    assert!(captured > BASH_MAX_OUTPUT_SIZE);
    assert!(captured <= BASH_MAX_OUTPUT_SIZE + crate::constants::BASH_READ_CHUNK_SIZE);
}

#[tokio::test]
async fn test_bash_spawn_failure_is_tool_output() {
    let tool = BashTool::with_shell(FixedAnswer::new(true), "/nonexistent/parley-shell");
    let result = tool.run("echo hi").await;
    assert_eq!(result.output, BASH_SPAWN_FAILED);
}

#[tokio::test]
async fn test_bash_background_job_does_not_block() {
    let tool = BashTool::new(FixedAnswer::new(true));
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        tool.run("sleep 20 & echo started"),
    )
    .await
    .expect("background job held the tool open");
    assert!(result.output.starts_with("started\n"));
    assert!(result.output.ends_with("\n[exit code: 0]"));
    assert!(!result.truncated);
}
