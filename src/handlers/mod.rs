//! # Task Handlers
//!
//! The [`TaskHandler`] trait and the built-in handlers.

pub mod count_metric;
pub mod distinct_name;
pub mod errors;
pub mod traits;

pub use count_metric::{CountMetric, EventId};
pub use distinct_name::{DistinctNameHandler, DISTINCT_NAME_TASK, EVENTS_INDEX};
pub use errors::{HandlerError, HandlerResult};
pub use traits::TaskHandler;
