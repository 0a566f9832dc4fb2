//! Struct definitions and strong value types for parley configuration.

use serde::Deserialize;
use std::fmt;

use crate::constants::TEMPERATURE_RANGE;

/// Secret bearer token for the provider.
///
/// `Debug` and `Display` only reveal the first 12 characters.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The full key, for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First 12 characters followed by `...`.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(12).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.redacted())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Provider model identifier, e.g. `anthropic/claude-sonnet-4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper bound on completion tokens. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxTokens(u32);

impl MaxTokens {
    /// Returns `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MaxTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sampling temperature within the provider's accepted range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature(f64);

impl Temperature {
    /// Returns `None` when the value is outside 0.0–2.0 or not finite.
    pub fn new(value: f64) -> Option<Self> {
        let (lo, hi) = TEMPERATURE_RANGE;
        (value.is_finite() && (lo..=hi).contains(&value)).then_some(Self(value))
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Instructions sent as the leading system message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt(String);

impl SystemPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully resolved, read-only configuration for one process run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub model: ModelId,
    pub max_tokens: MaxTokens,
    pub system_prompt: Option<SystemPrompt>,
    pub temperature: Option<Temperature>,
    /// Chat-completions base URL (without the `/chat/completions` path).
    pub base_url: String,
    /// Print the configuration and exit instead of starting the REPL.
    pub show_config: bool,
}

/// Contents of `config.toml` / `parley.toml`. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub temperature: Option<f64>,
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("sk-or-v1-0123456789abcdef");
        assert_eq!(key.redacted(), "sk-or-v1-012...");
        assert!(!format!("{:?}", key).contains("abcdef"));
        assert_eq!(key.expose(), "sk-or-v1-0123456789abcdef");
    }

    #[test]
    fn test_max_tokens_rejects_zero() {
        assert!(MaxTokens::new(0).is_none());
        assert_eq!(MaxTokens::new(4096).map(|m| m.get()), Some(4096));
    }

    #[test]
    fn test_temperature_range() {
        assert!(Temperature::new(0.0).is_some());
        assert!(Temperature::new(2.0).is_some());
        assert!(Temperature::new(2.5).is_none());
        assert!(Temperature::new(-0.1).is_none());
        assert!(Temperature::new(f64::NAN).is_none());
    }
}
