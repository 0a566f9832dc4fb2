//! Interactive chat REPL for parley.
//!
//! Reads lines with [`rustyline`] (history, line editing), dispatches
//! built-in commands, and hands everything else to a [`ChatClient`]. A
//! failed turn is reported and rolled back; only `/exit`, `/quit` or end
//! of input leave the loop.

mod commands;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::agent::{Agent, ChatClient, ChatResponse};
use crate::config::{Config, ModelId};
use crate::constants::{APP_NAME, HISTORY_FILENAME};
use crate::conversation::Conversation;
use crate::format;
use crate::output::StdoutRenderer;
use crate::permissions::StdinConfirm;
use crate::provider::{ApiError, HttpTransport, RequestSettings, StopReason};
use crate::tokens::format_token_usage;
use crate::tools::ToolRegistry;
use commands::CommandAction;

/// One read from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl+C: drop the current line and keep going.
    Interrupted,
    /// Ctrl+D or closed stdin.
    Eof,
}

/// Source of user lines.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;

    /// Record a line the user actually sent.
    fn add_history(&mut self, _line: &str) {}
}

/// Readline-backed input with history persisted across runs.
pub struct ReadlineInput {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl ReadlineInput {
    pub fn new() -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        let history_path = match Config::cache_dir() {
            Ok(dir) => Some(dir.join(HISTORY_FILENAME)),
            Err(e) => {
                tracing::debug!("no cache dir, history disabled: {e:#}");
                None
            }
        };
        if let Some(ref path) = history_path {
            if path.exists() {
                if let Err(e) = editor.load_history(path) {
                    tracing::warn!("failed to load history from {}: {e}", path.display());
                }
            }
        }
        Ok(Self {
            editor,
            history_path,
        })
    }

    /// Write history back to disk. Failures are logged, not fatal.
    pub fn save_history(&mut self) {
        let Some(ref path) = self.history_path else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create {}: {e}", parent.display());
                return;
            }
        }
        if let Err(e) = self.editor.save_history(path) {
            tracing::warn!("failed to save history to {}: {e}", path.display());
        }
    }
}

impl LineReader for ReadlineInput {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            tracing::debug!("history entry rejected: {e}");
        }
    }
}

/// Result of handing one line to the client.
#[derive(Debug)]
pub enum TurnOutcome {
    Answered(ChatResponse),
    Failed(ApiError),
}

/// The read-dispatch-print loop, independent of the terminal.
pub struct ChatRepl<C: ChatClient, W: Write> {
    client: C,
    conversation: Conversation,
    model: ModelId,
    out: W,
}

impl<C: ChatClient, W: Write> ChatRepl<C, W> {
    pub fn new(client: C, conversation: Conversation, model: ModelId, out: W) -> Self {
        Self {
            client,
            conversation,
            model,
            out,
        }
    }

    #[cfg(test)]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Runs until `/exit`, `/quit` or end of input.
    pub async fn run(&mut self, input: &mut dyn LineReader) -> Result<()> {
        self.display_welcome()?;
        let prompt = format!("{} ", "You>".green().bold());

        loop {
            let line = match input.read_line(&prompt)? {
                Input::Line(line) => line,
                Input::Interrupted => {
                    writeln!(self.out, "{}", "^C".dimmed())?;
                    continue;
                }
                Input::Eof => {
                    writeln!(self.out)?;
                    break;
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match commands::handle_command(line, &mut self.conversation, &mut self.out)? {
                CommandAction::Exit => break,
                CommandAction::Handled => continue,
                CommandAction::NotACommand => {}
            }

            input.add_history(line);
            self.process_input(line).await?;
        }

        Ok(())
    }

    /// Sends one user turn. On failure the conversation is restored to its
    /// length before the turn and the error is printed to stderr.
    pub async fn process_input(&mut self, line: &str) -> io::Result<TurnOutcome> {
        let before = self.conversation.len();
        writeln!(self.out)?;

        match self.client.send(&mut self.conversation, line).await {
            Ok(response) => {
                self.display_response(&response)?;
                Ok(TurnOutcome::Answered(response))
            }
            Err(e) => {
                self.conversation.truncate(before);
                tracing::debug!("turn failed: {e:?}");
                eprintln!("{} {}", "error:".red().bold(), e);
                Ok(TurnOutcome::Failed(e))
            }
        }
    }

    fn display_welcome(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{} (model: {})",
            APP_NAME.bold().cyan(),
            self.model.as_str().yellow()
        )?;
        writeln!(self.out, "Type /help for commands, /exit to quit.")?;
        writeln!(self.out)
    }

    fn display_response(&mut self, response: &ChatResponse) -> io::Result<()> {
        writeln!(self.out, "{}", "Assistant>".cyan().bold())?;
        writeln!(self.out, "{}", format::render_markdown_lite(&response.text))?;
        match response.stop_reason {
            Some(StopReason::MaxTokens) => writeln!(
                self.out,
                "{}",
                "(response cut off at the max token limit)".yellow()
            )?,
            Some(StopReason::ContentFilter) => {
                writeln!(self.out, "{}", "(response stopped by content filter)".yellow())?
            }
            _ => {}
        }
        if let Some(ref usage) = response.usage {
            writeln!(self.out, "{}", format!("[{}]", format_token_usage(usage)).dimmed())?;
        }
        writeln!(self.out)
    }
}

/// Builds the real agent and runs the REPL on the terminal.
pub async fn run_chat(config: Config) -> Result<()> {
    let transport = HttpTransport::new(&config.base_url, config.api_key.clone())?;
    let tools = ToolRegistry::with_builtins(Arc::new(StdinConfirm));
    let agent = Agent::new(
        transport,
        tools,
        RequestSettings::from_config(&config),
        config.system_prompt.clone(),
        Box::new(StdoutRenderer),
    );

    let mut conversation = Conversation::new();
    if let Some(ref prompt) = config.system_prompt {
        conversation.set_system_prompt(prompt.clone());
    }

    let mut input = ReadlineInput::new()?;
    let mut repl = ChatRepl::new(agent, conversation, config.model.clone(), io::stdout());
    let result = repl.run(&mut input).await;
    input.save_history();
    result
}
