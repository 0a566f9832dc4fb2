//! Command-line interface definition for parley.
//!
//! Uses [`clap`] for argument parsing with derive macros. Every flag is
//! optional; unset values fall through to the environment, config files
//! and defaults (see [`crate::config`]).

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

/// Top-level CLI structure for parley.
///
/// The `///` doc comments on fields double as `--help` text rendered by clap.
#[derive(Parser, Debug)]
#[command(
    name = "parley",
    about = "Terminal chat client for LLM chat-completions APIs",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Model ID (default: anthropic/claude-sonnet-4)
    #[arg(short, long, value_name = "ID")]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Max response tokens (default: 4096)
    #[arg(short = 't', long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// LLM temperature (0.0-2.0)
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Display resolved config and exit
    #[arg(long)]
    pub show_config: bool,
}

const AFTER_HELP: &str = "\
Environment variables:
  OPENROUTER_API_KEY          API key (required)
  LLM_MODEL                   Model ID override
  MAX_TOKENS                  Max tokens override
  TEMPERATURE                 LLM temperature override
  SYSTEM_PROMPT               System prompt
  OPENROUTER_BASE_URL         Chat-completions base URL

REPL commands:
  /exit, /quit                Exit the chat
  /clear                      Clear conversation history
  /help                       Show REPL commands";

/// Outcome of argument parsing.
pub enum Parsed {
    /// Arguments were valid; run with them.
    Run(Cli),
    /// `--help` (or `--version`) text was printed; exit successfully.
    Exit,
}

/// Parses process arguments.
///
/// Help output exits cleanly; any other parse failure becomes an error so
/// the process exits with status 1 rather than clap's default of 2.
pub fn parse() -> Result<Parsed> {
    parse_from(std::env::args_os())
}

/// Parses an explicit argument list (first item is the program name).
pub fn parse_from<I, T>(args: I) -> Result<Parsed>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Parsed::Run(cli)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            Ok(Parsed::Exit)
        }
        Err(e) => Err(anyhow::anyhow!(clap_message(&e))),
    }
}

/// clap's rendered error without its `error: ` prefix; the process exit
/// path already prints `Error: `.
fn clap_message(e: &clap::Error) -> String {
    let rendered = e.render().to_string();
    let trimmed = rendered.trim_end();
    trimmed.strip_prefix("error: ").unwrap_or(trimmed).to_string()
}
