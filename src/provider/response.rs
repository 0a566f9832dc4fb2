//! Interpretation of a chat-completions response envelope.

use serde_json::Value;

use super::error::ApiError;
use crate::codec;
use crate::message::Message;
use crate::tokens::TokenUsage;

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
    ToolCalls,
    Other(String),
}

impl StopReason {
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "length" => StopReason::MaxTokens,
            "content_filter" => StopReason::ContentFilter,
            "tool_calls" => StopReason::ToolCalls,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// What the first choice's message asks the agent loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Assistant message with a non-empty `tool_calls` list.
    ToolCalls(Message),
    /// Final text answer.
    Text(String),
    /// Neither text nor tool calls. Carries the assistant message to echo
    /// back when the provider sent a `content` key at all.
    Empty(Option<Message>),
}

/// One parsed response.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub reply: Reply,
    pub usage: Option<TokenUsage>,
    pub stop_reason: Option<StopReason>,
}

/// Parses `choices[0]` of a response body.
///
/// # Errors
///
/// [`ApiError::MalformedResponse`] when `choices` is missing or empty, or
/// when the first choice's message does not decode.
pub fn parse_completion(body: &Value) -> Result<Completion, ApiError> {
    let choice = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| ApiError::MalformedResponse("Response missing choices array".into()))?;

    let raw = choice
        .get("message")
        .ok_or_else(|| ApiError::MalformedResponse("Response choice missing message".into()))?;
    let has_content_key = raw.get("content").is_some();
    let message = codec::decode(raw)?;

    let reply = if message.has_tool_calls() {
        Reply::ToolCalls(message)
    } else {
        match message.content.as_deref() {
            Some(text) if !text.is_empty() => Reply::Text(text.to_string()),
            _ if has_content_key => Reply::Empty(Some(message)),
            _ => Reply::Empty(None),
        }
    };

    let stop_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .map(StopReason::from_finish_reason);

    let usage = body
        .get("usage")
        .and_then(|u| serde_json::from_value::<TokenUsage>(u.clone()).ok())
        .filter(|u| !u.is_empty());

    Ok(Completion {
        reply,
        usage,
        stop_reason,
    })
}
