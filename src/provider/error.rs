//! Errors that abort a single chat turn.

use thiserror::Error;

use crate::codec::CodecError;

/// Failure of one turn against the provider.
///
/// Every variant aborts the current turn only; the REPL reports it, rolls
/// the conversation back and keeps reading input.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failure, timeout, or an unreadable response body.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-200 status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The body was not JSON or lacked the expected fields.
    #[error("{0}")]
    MalformedResponse(String),

    /// The model kept requesting tools past the round-trip limit.
    #[error("Agent loop exceeded {0} iterations without a final response")]
    AgentLoopExceeded(usize),
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        ApiError::MalformedResponse(err.to_string())
    }
}
