//! Message types for parley's conversation history.
//!
//! A [`Message`] is a role-tagged value. Plain chat turns carry text only;
//! inside a single agent turn an assistant message may also carry the
//! [`ToolCall`]s the model requested, and a tool message carries the
//! `tool_call_id` it answers. The wire mapping lives in [`crate::codec`].

/// A tool invocation requested by the LLM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Provider-assigned identifier, echoed back unchanged in the tool result.
    pub id: String,
    /// Name of the function to invoke.
    pub function_name: String,
    /// JSON-encoded argument object, exactly as the provider sent it.
    pub arguments: String,
}

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// The role name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    /// Parses a wire role name. Returns `None` for unknown roles.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "tool" => Some(Role::Tool),
            _ => None,
        }
    }
}

/// A single message in a conversation.
///
/// `content` is `None` only for assistant messages whose wire content was
/// `null` (tool-call replies and the degenerate replies the agent loop
/// nudges past). Messages committed to a
/// [`Conversation`](crate::conversation::Conversation) always have text and
/// never carry tool calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub tool_call_id: Option<String>,
}

impl Message {
    fn with_text(role: Role, text: String) -> Self {
        Self {
            role,
            content: Some(text),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_text(Role::User, text.into())
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_text(Role::Assistant, text.into())
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::with_text(Role::System, text.into())
    }

    /// Creates a tool result message answering `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Returns the text content, or `""` when the content is null.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
