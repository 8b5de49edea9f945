//! Relay error types.

use std::time::Duration;

use thiserror::Error;

/// Convenience alias for relay results.
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors that end a relay request. None of them are retried.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Chat API error: {status} {body}")]
    Upstream { status: u16, body: String },

    #[error("Chat API request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Chat API request failed: {0}")]
    Request(String),

    #[error("Chat API response parse error: {0}")]
    Decode(String),

    #[error("No reply text found in chat API response")]
    NoText,
}
