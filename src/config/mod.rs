//! Configuration types and layered resolution for parley.
//!
//! Values come from CLI flags, the process environment (seeded from
//! `.env.local`, `.env` and `~/.config/parley/.env`), optional TOML files
//! (`~/.config/parley/config.toml` and a project `parley.toml`) and
//! built-in defaults, in that order of precedence. The result is an
//! immutable [`Config`] built once at startup.

mod agents;
mod loader;
mod paths;
mod resolve;
mod types;

pub use loader::load_env_files;
use resolve::process_env;
pub use types::{ApiKey, Config, FileConfig, MaxTokens, ModelId, SystemPrompt, Temperature};

use anyhow::Result;

use crate::cli::Cli;

impl Config {
    /// Load config with precedence: CLI > env > project file > global file > defaults.
    ///
    /// Expects `.env` files to have been loaded already (see [`load_env_files`]).
    /// `AGENTS.md` in the current directory is appended to the system prompt.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = FileConfig::load()?;
        let mut config = Self::resolve(cli, &file, &process_env)?;
        config.append_agents_file(&std::env::current_dir()?);
        Ok(config)
    }
}
