//! # Handler Registry
//!
//! Task name to handler lookup table. Populated before the processor starts,
//! then shared read-only between worker slots without locking.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::handlers::TaskHandler;
use crate::processor::ProcessorError;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handler_count", &self.handlers.len())
            .field("task_names", &self.task_names())
            .finish()
    }
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `task_name`
    ///
    /// A task name can be bound only once.
    pub fn register(
        &mut self,
        task_name: impl Into<String>,
        handler: Arc<dyn TaskHandler>,
    ) -> Result<(), ProcessorError> {
        let task_name = task_name.into();
        if self.handlers.contains_key(&task_name) {
            return Err(ProcessorError::DuplicateHandler { task_name });
        }

        info!(task_name = %task_name, handler = handler.name(), "Registered task handler");
        self.handlers.insert(task_name, handler);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, task_name: &str) -> Option<Arc<dyn TaskHandler>> {
        self.handlers.get(task_name).cloned()
    }

    #[must_use]
    pub fn contains(&self, task_name: &str) -> bool {
        self.handlers.contains_key(task_name)
    }

    /// Registered task names, sorted
    #[must_use]
    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
