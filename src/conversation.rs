//! Ordered, role-tagged chat history plus an optional system prompt.
//!
//! Pure data: no I/O. Only finished turns (a user message and the final
//! assistant text) are ever stored here; tool-call chatter stays in the
//! agent loop's working list.

use crate::config::SystemPrompt;
use crate::message::Message;

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    system_prompt: Option<SystemPrompt>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pre-built message.
    pub fn add(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn add_user(&mut self, text: impl Into<String>) {
        self.add(Message::user(text));
    }

    pub fn add_assistant(&mut self, text: impl Into<String>) {
        self.add(Message::assistant(text));
    }

    /// All messages, in chat order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clear all messages. The system prompt is kept.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Drop everything after the first `len` messages.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    pub fn system_prompt(&self) -> Option<&SystemPrompt> {
        self.system_prompt.as_ref()
    }

    pub fn set_system_prompt(&mut self, prompt: SystemPrompt) {
        self.system_prompt = Some(prompt);
    }
}
