//! # Registry
//!
//! Lookup tables populated at startup.

pub mod handler_registry;

pub use handler_registry::HandlerRegistry;
