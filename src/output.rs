//! Progress display for tool activity during an agent turn.
//!
//! The agent loop reports through [`Renderer`] so tests can run it without
//! a terminal. [`StdoutRenderer`] is what the REPL uses.

use colored::Colorize;
use serde_json::Value;

use crate::constants::TOOL_OUTPUT_PREVIEW_LINES;
use crate::format::preview_lines;
use crate::tools::ToolResult;

/// Receives tool events from the agent loop.
pub trait Renderer: Send {
    /// A tool is about to run with the given raw JSON arguments.
    fn tool_start(&mut self, name: &str, arguments: &str);

    /// A tool finished.
    fn tool_result(&mut self, name: &str, result: &ToolResult);
}

/// Prints tool activity to stdout.
pub struct StdoutRenderer;

impl Renderer for StdoutRenderer {
    fn tool_start(&mut self, name: &str, arguments: &str) {
        let shown = serde_json::from_str::<Value>(arguments)
            .ok()
            .and_then(|v| v.get("command").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| arguments.to_string());
        println!("{} {}", format!("[{name}]").cyan().bold(), shown);
    }

    fn tool_result(&mut self, _name: &str, result: &ToolResult) {
        let preview = preview_lines(&result.output, TOOL_OUTPUT_PREVIEW_LINES);
        if !preview.is_empty() {
            println!("{}", preview.dimmed());
        }
        if result.truncated {
            println!("{}", "(output truncated)".yellow());
        }
    }
}

/// Discards every event.
#[cfg(test)]
pub struct NullRenderer;

#[cfg(test)]
impl Renderer for NullRenderer {
    fn tool_start(&mut self, _name: &str, _arguments: &str) {}

    fn tool_result(&mut self, _name: &str, _result: &ToolResult) {}
}
