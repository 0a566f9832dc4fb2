//! Chat-completions provider plumbing for parley.
//!
//! Request assembly, a single-shot HTTP [`Transport`], and interpretation of
//! the response envelope. The agent loop drives these; nothing here retries.

mod error;
mod request;
mod response;
mod transport;

pub use error::ApiError;
pub use request::{build_request, RequestSettings};
pub use response::{parse_completion, Completion, Reply, StopReason};
pub use transport::{HttpTransport, Transport};
