//! # Adapter Error Types
//!
//! Structured errors for queue adapters using thiserror instead of
//! `Box<dyn Error>` patterns.

use thiserror::Error;

/// Errors raised by queue adapters and the adapter factory
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Unknown queue adapter: {name}")]
    UnknownAdapter { name: String },

    #[error("Adapter connection error: {message}")]
    Connection { message: String },

    #[error("Adapter disconnected: {message}")]
    Disconnected { message: String },

    #[error("Adapter is not connected: {adapter}")]
    NotConnected { adapter: String },

    #[error("Receive failed on queue {queue_name}: {message}")]
    Receive { queue_name: String, message: String },

    #[error("Ack failed on queue {queue_name} for receipt {receipt}: {message}")]
    Ack {
        queue_name: String,
        receipt: String,
        message: String,
    },

    #[error("Nack failed on queue {queue_name} for receipt {receipt}: {message}")]
    Nack {
        queue_name: String,
        receipt: String,
        message: String,
    },

    #[error("Invalid receipt handle: {receipt}")]
    InvalidReceiptHandle { receipt: String },

    #[error("Queue {queue_name} is full ({capacity} pending deliveries)")]
    QueueFull { queue_name: String, capacity: usize },

    #[error("Adapter configuration error: {adapter}: {message}")]
    Configuration { adapter: String, message: String },
}

impl AdapterError {
    /// Create an unknown adapter error
    pub fn unknown_adapter(name: impl Into<String>) -> Self {
        Self::UnknownAdapter { name: name.into() }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a disconnected error
    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::Disconnected {
            message: message.into(),
        }
    }

    /// Create a not connected error
    pub fn not_connected(adapter: impl Into<String>) -> Self {
        Self::NotConnected {
            adapter: adapter.into(),
        }
    }

    /// Create a receive error
    pub fn receive(queue_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Receive {
            queue_name: queue_name.into(),
            message: message.into(),
        }
    }

    /// Create an ack error
    pub fn ack(
        queue_name: impl Into<String>,
        receipt: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Ack {
            queue_name: queue_name.into(),
            receipt: receipt.into(),
            message: message.into(),
        }
    }

    /// Create a nack error
    pub fn nack(
        queue_name: impl Into<String>,
        receipt: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Nack {
            queue_name: queue_name.into(),
            receipt: receipt.into(),
            message: message.into(),
        }
    }

    /// Create an invalid receipt handle error
    pub fn invalid_receipt_handle(receipt: impl Into<String>) -> Self {
        Self::InvalidReceiptHandle {
            receipt: receipt.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            adapter: adapter.into(),
            message: message.into(),
        }
    }

    /// Whether the adapter can no longer yield deliveries.
    ///
    /// Fatal errors stop the processor; everything else is retried after the
    /// idle wait.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownAdapter { .. }
                | Self::Connection { .. }
                | Self::Disconnected { .. }
                | Self::NotConnected { .. }
                | Self::Configuration { .. }
        )
    }
}

impl From<lapin::Error> for AdapterError {
    fn from(err: lapin::Error) -> Self {
        match err {
            lapin::Error::InvalidConnectionState(_) | lapin::Error::InvalidChannelState(_) => {
                AdapterError::disconnected(err.to_string())
            }
            _ => AdapterError::connection(err.to_string()),
        }
    }
}

/// Result type alias for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;
