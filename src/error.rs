//! Top-level error type for the worker process

use thiserror::Error;

use crate::config::ConfigurationError;
use crate::handlers::HandlerError;
use crate::messaging::AdapterError;
use crate::processor::ProcessorError;
use crate::store::StoreError;

/// Any error that can end a worker run
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Processor(#[from] ProcessorError),
}

pub type Result<T> = std::result::Result<T, WorkerError>;
