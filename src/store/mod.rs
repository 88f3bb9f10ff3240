//! # Event Store
//!
//! Counter, record and index storage used by task handlers.

pub mod errors;
pub mod in_memory;
pub mod redis;
pub mod traits;

pub use errors::{StoreError, StoreResult};
pub use in_memory::InMemoryEventStore;
pub use self::redis::{redis_url, RedisEventStore, DEFAULT_CONNECT_TIMEOUT};
pub use traits::EventStore;
