//! Centralized constants for parley.
//!
//! All magic numbers, default strings, and wire-level literals live here
//! so they can be changed in one place.

use std::time::Duration;

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "parley";

// --- Defaults ---

/// Default model identifier (OpenRouter `vendor/model` form).
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4";

/// Default maximum tokens for a completion.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default chat-completions base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Path appended to the base URL for chat completions.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Inclusive bounds accepted for the sampling temperature.
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);

// --- Files ---

/// Global configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "parley.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

/// Project instructions file appended to the system prompt.
pub const AGENTS_FILENAME: &str = "AGENTS.md";

// --- Environment variables ---

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_MODEL: &str = "LLM_MODEL";
pub const ENV_MAX_TOKENS: &str = "MAX_TOKENS";
pub const ENV_SYSTEM_PROMPT: &str = "SYSTEM_PROMPT";
pub const ENV_TEMPERATURE: &str = "TEMPERATURE";
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";

// --- HTTP ---

/// Seconds allowed to establish a connection.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Seconds allowed for a whole request/response exchange.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

// --- Agent loop ---

/// Maximum provider round-trips per user turn.
pub const MAX_AGENT_ITERATIONS: usize = 20;

/// Synthetic user message sent when the model returns neither text nor tool calls.
pub const NUDGE_MESSAGE: &str = "Please use your tools or respond with text.";

// --- Bash tool ---

/// Soft cap on captured command output, in bytes.
pub const BASH_MAX_OUTPUT_SIZE: usize = 100_000;

/// Read size for each chunk of command output.
pub const BASH_READ_CHUNK_SIZE: usize = 4096;

/// How long to keep reading after the shell exits before giving up on
/// output from background jobs.
pub const BASH_DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Shell used to run commands.
pub const BASH_SHELL: &str = "bash";

/// Appended once the output cap is crossed.
pub const BASH_TRUNCATION_MARKER: &str = "\n... [truncated at 100KB]";

/// Tool result when the user declines a command.
pub const BASH_SKIPPED: &str = "Command skipped by user";

/// Tool result when the shell cannot be started.
pub const BASH_SPAWN_FAILED: &str = "Error: failed to execute command";

/// Lines of tool output echoed to the terminal after a command runs.
pub const TOOL_OUTPUT_PREVIEW_LINES: usize = 10;
