//! Chat-completions request body assembly.

use serde_json::{json, Value};

use crate::codec::{self, WireMessage};
use crate::config::{Config, MaxTokens, ModelId, Temperature};
use crate::message::Message;

/// Per-request knobs taken from the resolved configuration.
#[derive(Debug, Clone)]
pub struct RequestSettings {
    pub model: ModelId,
    pub max_tokens: MaxTokens,
    pub temperature: Option<Temperature>,
}

impl RequestSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Builds `{model, max_tokens, messages, tools, temperature?}`.
///
/// `temperature` is omitted entirely when unset so the provider default
/// applies.
pub fn build_request(settings: &RequestSettings, messages: &[Message], tools: &[Value]) -> Value {
    let wire: Vec<WireMessage> = codec::encode_all(messages);
    let mut body = json!({
        "model": settings.model.as_str(),
        "max_tokens": settings.max_tokens.get(),
        "messages": wire,
        "tools": tools,
    });
    if let Some(t) = settings.temperature {
        body["temperature"] = json!(t.get());
    }
    body
}
