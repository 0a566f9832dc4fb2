//! Layered resolution of the final [`Config`] and `{env:VAR}` substitution.
//!
//! Precedence for every field: CLI flag > environment variable > TOML
//! file > built-in default.

use anyhow::{anyhow, bail, Result};
use std::io::Write;

use super::types::{ApiKey, Config, FileConfig, MaxTokens, ModelId, SystemPrompt, Temperature};
use crate::cli::Cli;
use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, ENV_API_KEY, ENV_BASE_URL,
    ENV_MAX_TOKENS, ENV_MODEL, ENV_SYSTEM_PROMPT, ENV_TEMPERATURE,
};

/// Looks up an environment variable, treating empty values as unset.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Reads from the real process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Combines CLI flags, environment and file values into a [`Config`].
    ///
    /// # Errors
    ///
    /// Fails when the API key is missing (unless `--show-config` is set) or
    /// when a numeric value does not parse or is out of range.
    pub fn resolve(cli: &Cli, file: &FileConfig, env: EnvLookup<'_>) -> Result<Self> {
        let api_key = match env(ENV_API_KEY).or_else(|| non_empty(&file.api_key)) {
            Some(key) => ApiKey::new(key),
            None if cli.show_config => ApiKey::new(""),
            None => bail!(
                "{ENV_API_KEY} not set. Set it in .env or export it as an environment variable."
            ),
        };

        let model = cli
            .model
            .clone()
            .or_else(|| env(ENV_MODEL))
            .or_else(|| non_empty(&file.model))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_tokens = match (cli.max_tokens, env(ENV_MAX_TOKENS)) {
            (Some(n), _) => n,
            (None, Some(raw)) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("Invalid {ENV_MAX_TOKENS} value: '{raw}'"))?,
            (None, None) => file.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        };
        let max_tokens = MaxTokens::new(max_tokens)
            .ok_or_else(|| anyhow!("Max tokens must be greater than zero"))?;

        let system_prompt = cli
            .system_prompt
            .clone()
            .or_else(|| env(ENV_SYSTEM_PROMPT))
            .or_else(|| non_empty(&file.system_prompt))
            .map(SystemPrompt::new);

        let temperature = match (cli.temperature, env(ENV_TEMPERATURE)) {
            (Some(t), _) => Some(t),
            (None, Some(raw)) => Some(
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| anyhow!("Invalid {ENV_TEMPERATURE} value: '{raw}'"))?,
            ),
            (None, None) => file.temperature,
        };
        let temperature = temperature
            .map(|t| {
                Temperature::new(t)
                    .ok_or_else(|| anyhow!("Temperature must be between 0.0 and 2.0, got {t}"))
            })
            .transpose()?;

        let base_url = env(ENV_BASE_URL)
            .or_else(|| non_empty(&file.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            api_key,
            model: ModelId::new(model),
            max_tokens,
            system_prompt,
            temperature,
            base_url,
            show_config: cli.show_config,
        })
    }

    /// Writes the resolved configuration, with the API key redacted.
    pub fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let key = if self.api_key.expose().is_empty() {
            "(not set)".to_string()
        } else {
            self.api_key.redacted()
        };
        writeln!(out, "Configuration:")?;
        writeln!(out, "  Model:       {}", self.model)?;
        writeln!(out, "  Max tokens:  {}", self.max_tokens)?;
        writeln!(out, "  API key:     {}", key)?;
        writeln!(out, "  Endpoint:    {}", self.base_url)?;
        if let Some(t) = self.temperature {
            writeln!(out, "  Temperature: {}", t)?;
        }
        if let Some(ref sp) = self.system_prompt {
            writeln!(out, "  System:      {}", sp)?;
        }
        Ok(())
    }
}

impl FileConfig {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        for field in [
            &mut self.api_key,
            &mut self.model,
            &mut self.system_prompt,
            &mut self.base_url,
        ] {
            if let Some(value) = field.as_mut() {
                *value = resolve_str(value, &process_env);
            }
        }
    }
}

/// Replace {env:VAR} with the environment variable value (empty if unset).
///
/// Substituted values are copied verbatim and never rescanned.
pub(super) fn resolve_str(s: &str, env: EnvLookup<'_>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("{env:") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 5..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&env(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}
