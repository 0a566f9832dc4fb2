//! XDG path resolution for parley configuration, env files and history.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::types::Config;

impl Config {
    /// Returns the platform-specific configuration directory for parley.
    ///
    /// Returns `~/.config/parley/` on Linux (`XDG_CONFIG_HOME/parley`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the platform-specific cache directory for parley.
    ///
    /// Used for the readline history file.
    pub fn cache_dir() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns `~/.config/parley/config.toml` on Linux.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }
}

/// `.env` files to load, highest precedence first.
///
/// Local override, then project, then user-level. `user_config_dir` is
/// `None` when the platform has no config directory.
pub fn env_file_candidates(project_dir: &Path, user_config_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![project_dir.join(".env.local"), project_dir.join(".env")];
    if let Some(dir) = user_config_dir {
        candidates.push(dir.join(".env"));
    }
    candidates
}
