//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating configuration
///
/// All of these are fatal at startup; nothing in this module is consulted
/// once the processor is running.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {message}")]
    Load { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown property '{property}' for adapter '{adapter}'")]
    UnknownProperty { adapter: String, property: String },

    #[error("Invalid {expected} value for property '{property}': {value}")]
    InvalidProperty {
        property: String,
        expected: String,
        value: String,
    },
}

impl ConfigurationError {
    /// Create a load error
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown property error
    pub fn unknown_property(adapter: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            adapter: adapter.into(),
            property: property.into(),
        }
    }

    /// Create an invalid property error
    pub fn invalid_property(
        property: impl Into<String>,
        expected: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            property: property.into(),
            expected: expected.into(),
            value: value.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(err: config::ConfigError) -> Self {
        ConfigurationError::load(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigurationError>;
