//! File loading for parley configuration: `.env` layering and TOML files.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::paths::env_file_candidates;
use super::types::{Config, FileConfig};

/// Loads `.env` files into the process environment.
///
/// Candidates are visited highest precedence first and `dotenvy` never
/// overrides a variable that is already set, so the real environment beats
/// `.env.local`, which beats `.env`, which beats the user-level file.
/// Returns the files that were actually loaded.
pub fn load_env_files() -> Result<Vec<std::path::PathBuf>> {
    let cwd = std::env::current_dir()?;
    let user_dir = Config::config_dir().ok();
    let mut loaded = Vec::new();
    for path in env_file_candidates(&cwd, user_dir.as_deref()) {
        if !path.is_file() {
            continue;
        }
        dotenvy::from_path(&path)
            .with_context(|| format!("Failed to load env file {:?}", path))?;
        tracing::debug!(path = %path.display(), "loaded env file");
        loaded.push(path);
    }
    Ok(loaded)
}

impl FileConfig {
    /// Loads the global config merged with the nearest project config.
    ///
    /// Missing files are not an error; a file that exists but does not
    /// parse is.
    pub fn load() -> Result<Self> {
        let global = match Config::config_path() {
            Ok(path) => Self::read(&path)?.unwrap_or_default(),
            Err(_) => FileConfig::default(),
        };
        let project = Self::find_project(&std::env::current_dir()?)?;

        let mut merged = match project {
            Some(proj) => Self::merge(global, proj),
            None => global,
        };
        merged.resolve_substitutions();
        Ok(merged)
    }

    /// Reads and parses one TOML file, returning `None` if it does not exist.
    pub(super) fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(Some(config))
    }

    /// Look for parley.toml in `start`, then walk up to the git root.
    pub(super) fn find_project(start: &Path) -> Result<Option<Self>> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if let Some(config) = Self::read(&candidate)? {
                tracing::debug!(path = %candidate.display(), "loaded project config");
                return Ok(Some(config));
            }
            // Stop at git root or filesystem root
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Merge project config over global config. Project values win when present.
    pub(super) fn merge(global: FileConfig, project: FileConfig) -> FileConfig {
        FileConfig {
            api_key: project.api_key.or(global.api_key),
            model: project.model.or(global.model),
            max_tokens: project.max_tokens.or(global.max_tokens),
            system_prompt: project.system_prompt.or(global.system_prompt),
            temperature: project.temperature.or(global.temperature),
            base_url: project.base_url.or(global.base_url),
        }
    }
}
