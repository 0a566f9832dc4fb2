//! Entry point for parley, a terminal chat client with a human-approved
//! bash tool.
//!
//! Parses arguments, layers `.env` files into the environment, resolves the
//! configuration, then either prints it (`--show-config`) or starts the
//! chat REPL.

mod agent;
mod chat;
mod cli;
mod codec;
mod config;
mod constants;
mod conversation;
mod format;
mod message;
mod output;
mod permissions;
mod provider;
mod tokens;
mod tools;

use anyhow::Result;
use std::io::IsTerminal;

use crate::cli::Parsed;
use crate::config::{load_env_files, Config};

/// Runs the parley CLI. Any error exits with status 1.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();

    let cli = match cli::parse()? {
        Parsed::Run(cli) => cli,
        Parsed::Exit => return Ok(()),
    };

    let loaded = load_env_files()?;
    tracing::debug!(files = loaded.len(), "environment files loaded");

    let config = Config::load(&cli)?;
    if config.show_config {
        config.print(&mut std::io::stdout())?;
        return Ok(());
    }

    chat::run_chat(config).await
}

/// Logs go to stderr; stdout belongs to the conversation.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}
