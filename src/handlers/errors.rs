//! Handler error types

use std::time::Duration;

use thiserror::Error;

use crate::store::StoreError;

/// Error types for task handler failures
///
/// Every variant is per-delivery: the processor logs it, nacks the delivery
/// and carries on.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Unsupported payload envelope: content type {content_type}")]
    Envelope { content_type: String },

    #[error("Failed to decode payload: {reason} (payload: {payload})")]
    Decode { reason: String, payload: String },

    #[error("Store error for metric {metric}: {source}")]
    Store {
        metric: String,
        #[source]
        source: StoreError,
    },

    #[error("Handler timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("Handler panicked: {message}")]
    Panicked { message: String },
}

impl HandlerError {
    /// Create an envelope error
    pub fn envelope(content_type: impl Into<String>) -> Self {
        Self::Envelope {
            content_type: content_type.into(),
        }
    }

    /// Create a decode error carrying the offending payload
    pub fn decode(reason: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            payload: payload.into(),
        }
    }

    /// Create a store error for `metric`
    pub fn store(metric: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            metric: metric.into(),
            source,
        }
    }

    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Envelope { .. } => "envelope",
            Self::Decode { .. } => "decode",
            Self::Store { .. } => "store",
            Self::Timeout { .. } => "timeout",
            Self::Panicked { .. } => "panicked",
        }
    }
}

/// Result type for handler execution
pub type HandlerResult<T> = Result<T, HandlerError>;
