//! Processor error types

use thiserror::Error;

use crate::messaging::AdapterError;

/// Errors surfaced by the task processor lifecycle
///
/// Per-delivery failures never appear here; they are logged, counted and
/// nacked inside the worker slots.
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Handler already registered for task '{task_name}'")]
    DuplicateHandler { task_name: String },

    #[error("Queue adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Invalid processor configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Worker slot panicked: {message}")]
    SlotPanicked { message: String },
}

impl ProcessorError {
    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for processor operations
pub type ProcessorResult<T> = Result<T, ProcessorError>;
