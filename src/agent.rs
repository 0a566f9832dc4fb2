//! The agentic tool-call loop.
//!
//! One user turn is resolved against a *working* message list: system
//! prompt, prior history, the new user message, then any tool-call chatter.
//! The long-lived [`Conversation`] only receives the user message and the
//! final assistant text, and only once the turn succeeds.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::SystemPrompt;
use crate::constants::{MAX_AGENT_ITERATIONS, NUDGE_MESSAGE};
use crate::conversation::Conversation;
use crate::message::{Message, ToolCall};
use crate::output::Renderer;
use crate::provider::{
    build_request, parse_completion, ApiError, Reply, RequestSettings, StopReason, Transport,
};
use crate::tokens::TokenUsage;
use crate::tools::ToolRegistry;

/// Final outcome of a successful turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub text: String,
    /// Usage reported with the final response only.
    pub usage: Option<TokenUsage>,
    pub stop_reason: Option<StopReason>,
}

/// Anything the REPL can hand a user line to.
#[async_trait]
pub trait ChatClient: Send {
    /// Resolves one user turn. On success `conversation` has grown by the
    /// user message and the assistant reply; on error it is unchanged.
    async fn send(
        &mut self,
        conversation: &mut Conversation,
        input: &str,
    ) -> Result<ChatResponse, ApiError>;
}

/// Drives the model through tool calls until it answers with text.
pub struct Agent<T: Transport> {
    transport: T,
    tools: ToolRegistry,
    settings: RequestSettings,
    /// Takes precedence over the conversation's own prompt.
    system_prompt: Option<SystemPrompt>,
    renderer: Box<dyn Renderer>,
    max_iterations: usize,
}

impl<T: Transport> Agent<T> {
    pub fn new(
        transport: T,
        tools: ToolRegistry,
        settings: RequestSettings,
        system_prompt: Option<SystemPrompt>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            transport,
            tools,
            settings,
            system_prompt,
            renderer,
            max_iterations: MAX_AGENT_ITERATIONS,
        }
    }

    fn working_messages(&self, conversation: &Conversation, input: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(conversation.len() + 2);
        if let Some(prompt) = self
            .system_prompt
            .as_ref()
            .or_else(|| conversation.system_prompt())
        {
            messages.push(Message::system(prompt.as_str()));
        }
        messages.extend(conversation.messages().iter().cloned());
        messages.push(Message::user(input));
        messages
    }

    /// Runs one tool call. Failures become `Error: ...` text for the model
    /// rather than aborting the turn.
    async fn run_tool(&mut self, call: &ToolCall) -> String {
        tracing::info!(tool = %call.function_name, id = %call.id, "running tool call");
        self.renderer.tool_start(&call.function_name, &call.arguments);

        let input: Value = match serde_json::from_str(&call.arguments) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(tool = %call.function_name, "unparseable arguments: {e}");
                return format!("Error: invalid tool arguments: {e}");
            }
        };

        match self.tools.execute(&call.function_name, input).await {
            Ok(result) => {
                self.renderer.tool_result(&call.function_name, &result);
                result.output
            }
            Err(e) => {
                tracing::warn!(tool = %call.function_name, "tool failed: {e:#}");
                format!("Error: {e:#}")
            }
        }
    }
}

#[async_trait]
impl<T: Transport> ChatClient for Agent<T> {
    async fn send(
        &mut self,
        conversation: &mut Conversation,
        input: &str,
    ) -> Result<ChatResponse, ApiError> {
        let mut working = self.working_messages(conversation, input);
        let tools = self.tools.definitions();

        for iteration in 1..=self.max_iterations {
            let body = build_request(&self.settings, &working, &tools);
            tracing::debug!(iteration, messages = working.len(), "sending request");
            let raw = self.transport.post_request(&body).await?;
            let completion = parse_completion(&raw)?;

            match completion.reply {
                Reply::Text(text) => {
                    conversation.add_user(input);
                    conversation.add_assistant(text.clone());
                    return Ok(ChatResponse {
                        text,
                        usage: completion.usage,
                        stop_reason: completion.stop_reason,
                    });
                }
                Reply::ToolCalls(message) => {
                    let calls = message.tool_calls.clone();
                    working.push(message);
                    for call in &calls {
                        let output = self.run_tool(call).await;
                        working.push(Message::tool_result(&call.id, output));
                    }
                }
                Reply::Empty(echo) => {
                    tracing::debug!(iteration, "reply had no text or tool calls");
                    if let Some(echo) = echo {
                        working.push(echo);
                    }
                    working.push(Message::user(NUDGE_MESSAGE));
                }
            }
        }

        tracing::warn!(
            iterations = self.max_iterations,
            "model never produced a final answer"
        );
        Err(ApiError::AgentLoopExceeded(self.max_iterations))
    }
}
