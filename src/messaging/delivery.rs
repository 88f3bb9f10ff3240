//! # Delivery Types
//!
//! The unit of work handed from a queue adapter to the task processor.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Handle for acknowledging a received delivery
///
/// The format is adapter-specific:
/// - RabbitMQ: delivery tag as string
/// - Memory: internal sequence number as string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptHandle(pub String);

impl ReceiptHandle {
    /// Create a new receipt handle
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Try to parse the receipt handle as a u64 (delivery tags, sequence numbers)
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ReceiptHandle {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ReceiptHandle {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

impl From<&str> for ReceiptHandle {
    fn from(handle: &str) -> Self {
        Self(handle.to_string())
    }
}

/// One unit of work pulled from a queue
///
/// Carries the task name used for routing and an opaque payload. The payload
/// shape is the concern of whichever handler is registered for the task name.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Routing key into the handler registry
    pub task_name: String,

    /// Raw payload bytes as received from the transport
    pub payload: Vec<u8>,

    /// MIME type reported by the transport, if any
    pub content_type: Option<String>,

    /// Adapter-specific acknowledgement token
    pub receipt_handle: ReceiptHandle,

    /// Identifier assigned on receipt and carried through every log line
    pub correlation_id: Uuid,

    /// Whether the transport has delivered this message before
    pub redelivered: bool,

    /// When the adapter handed the delivery out
    pub received_at: DateTime<Utc>,
}

impl Delivery {
    /// Create a delivery with a fresh correlation id
    pub fn new(
        task_name: impl Into<String>,
        payload: Vec<u8>,
        receipt_handle: ReceiptHandle,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            payload,
            content_type: None,
            receipt_handle,
            correlation_id: Uuid::new_v4(),
            redelivered: false,
            received_at: Utc::now(),
        }
    }

    /// Set the content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Mark the delivery as redelivered
    pub fn with_redelivered(mut self, redelivered: bool) -> Self {
        self.redelivered = redelivered;
        self
    }

    /// Payload as text, replacing invalid UTF-8 sequences (for error context)
    pub fn payload_lossy(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}
