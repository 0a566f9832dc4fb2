//! Wire mapping between [`Message`] and the chat-completions JSON shape.
//!
//! Plain messages are `{role, content}`. Tool results add `tool_call_id`,
//! and assistant tool-call requests add a `tool_calls` array of
//! `{id, type: "function", function: {name, arguments}}` objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::message::{Message, Role, ToolCall};

/// A message as it appears on the wire.
pub type WireMessage = Value;

/// Errors produced while decoding wire messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: function_kind(),
            function: WireFunction {
                name: call.function_name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(wire: WireToolCall) -> Self {
        Self {
            id: wire.id,
            function_name: wire.function.name,
            arguments: wire.function.arguments,
        }
    }
}

/// Encodes a message into its wire JSON object.
pub fn encode(msg: &Message) -> WireMessage {
    let mut obj = Map::new();
    obj.insert("role".into(), Value::from(msg.role.as_str()));
    obj.insert(
        "content".into(),
        msg.content.clone().map(Value::String).unwrap_or(Value::Null),
    );
    if !msg.tool_calls.is_empty() {
        let calls: Vec<WireToolCall> = msg.tool_calls.iter().map(WireToolCall::from).collect();
        obj.insert(
            "tool_calls".into(),
            serde_json::to_value(calls).unwrap_or(Value::Null),
        );
    }
    if let Some(ref id) = msg.tool_call_id {
        obj.insert("tool_call_id".into(), Value::from(id.as_str()));
    }
    Value::Object(obj)
}

/// Encodes a slice of messages into a wire `messages` array.
pub fn encode_all(messages: &[Message]) -> Vec<WireMessage> {
    messages.iter().map(encode).collect()
}

/// Decodes a wire JSON object into a message.
///
/// `role` is always required. `content` may be absent or `null` only on
/// assistant messages; tool messages also require `tool_call_id`.
pub fn decode(wire: &WireMessage) -> Result<Message, CodecError> {
    let obj = wire
        .as_object()
        .ok_or_else(|| malformed("message is not a JSON object"))?;

    let role_name = obj
        .get("role")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing 'role'"))?;
    let role = Role::parse(role_name)
        .ok_or_else(|| malformed(format!("unknown role '{role_name}'")))?;

    let content = match obj.get("content") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None if role == Role::Assistant => None,
        Some(Value::Null) | None => {
            return Err(malformed(format!("missing 'content' on {role_name} message")))
        }
        Some(_) => return Err(malformed("'content' must be a string or null")),
    };

    let tool_calls = match obj.get("tool_calls") {
        None | Some(Value::Null) => Vec::new(),
        Some(raw) => {
            let calls: Vec<WireToolCall> = serde_json::from_value(raw.clone())
                .map_err(|e| malformed(format!("invalid 'tool_calls': {e}")))?;
            calls.into_iter().map(ToolCall::from).collect()
        }
    };

    let tool_call_id = obj
        .get("tool_call_id")
        .and_then(Value::as_str)
        .map(String::from);
    if role == Role::Tool && tool_call_id.is_none() {
        return Err(malformed("missing 'tool_call_id' on tool message"));
    }

    Ok(Message {
        role,
        content,
        tool_calls,
        tool_call_id,
    })
}

fn malformed(reason: impl Into<String>) -> CodecError {
    CodecError::MalformedMessage(reason.into())
}
