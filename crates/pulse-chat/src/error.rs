//! Error types for the assistant's session handling.
//!
//! Answering a question never fails; these cover messages a session refuses
//! to record and snapshots the front end could not load.

use chrono::{DateTime, Utc};
use pulse_core::PulseError;

/// Errors from the chat session layer.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("turn timestamp {attempted} is earlier than the last turn at {last}")]
    NonMonotonicTimestamp {
        last: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },
    #[error("snapshot unavailable: {0}")]
    Snapshot(String),
}

impl From<PulseError> for ChatError {
    fn from(e: PulseError) -> Self {
        ChatError::Snapshot(e.to_string())
    }
}
