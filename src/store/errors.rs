//! Event store error types

use thiserror::Error;

/// Errors that can occur during event store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to reach the store backend
    #[error("Store connection error: {0}")]
    Connection(String),

    /// A single command was rejected or failed in transit
    #[error("Store command {command} failed on {key}: {message}")]
    Command {
        command: &'static str,
        key: String,
        message: String,
    },

    /// The pipelined record/index write failed
    #[error("Store pipeline failed for {event_id}: {message}")]
    Pipeline { event_id: String, message: String },
}

impl StoreError {
    /// Create a command error
    pub fn command(
        command: &'static str,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Command {
            command,
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a pipeline error
    pub fn pipeline(event_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipeline {
            event_id: event_id.into(),
            message: message.into(),
        }
    }
}

/// Result type for event store operations
pub type StoreResult<T> = Result<T, StoreError>;
