//! # Worker Configuration
//!
//! Explicit, validated configuration for the worker process. Values are
//! layered by [`ConfigLoader`] (defaults, optional TOML file, environment)
//! and finally by command line overrides.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use metrics_worker::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//!
//! let processor = config.processor_config();
//! let adapter = config.adapter_config()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::messaging::{adapter_factory, AdapterConfig};
use crate::processor::ProcessorConfig;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};

/// Top-level worker configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub processor: ProcessorSettings,
    pub store: StoreSettings,
    pub adapter: AdapterSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSettings {
    pub concurrency: usize,
    pub wait_timeout_ms: u64,
    pub requeue_on_failure: bool,
    pub execute_timeout_ms: Option<u64>,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            concurrency: 1,
            wait_timeout_ms: 500,
            requeue_on_failure: false,
            execute_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// `host:port` or a `redis://` URL
    pub redis_address: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            redis_address: "localhost:6379".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Adapter name (`rabbit`, `memory`)
    pub name: String,

    /// Raw property values, keyed by schema property name
    pub properties: HashMap<String, String>,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            name: "rabbit".to_string(),
            properties: HashMap::new(),
        }
    }
}

/// Highest-precedence values, typically from explicitly passed CLI flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub concurrency: Option<usize>,
    pub wait_timeout_ms: Option<u64>,
    pub redis_address: Option<String>,
    pub adapter: Option<String>,
    pub requeue_on_failure: Option<bool>,
    pub execute_timeout_ms: Option<u64>,
    /// `(adapter, property, raw value)`
    pub adapter_properties: Vec<(String, String, String)>,
}

impl WorkerConfig {
    /// Apply overrides; adapter properties only apply to the selected adapter
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(concurrency) = overrides.concurrency {
            self.processor.concurrency = concurrency;
        }
        if let Some(wait_timeout_ms) = overrides.wait_timeout_ms {
            self.processor.wait_timeout_ms = wait_timeout_ms;
        }
        if let Some(requeue) = overrides.requeue_on_failure {
            self.processor.requeue_on_failure = requeue;
        }
        if let Some(execute_timeout_ms) = overrides.execute_timeout_ms {
            self.processor.execute_timeout_ms = Some(execute_timeout_ms);
        }
        if let Some(address) = overrides.redis_address {
            self.store.redis_address = address;
        }
        if let Some(adapter) = overrides.adapter {
            if adapter != self.adapter.name {
                self.adapter.properties.clear();
            }
            self.adapter.name = adapter;
        }

        for (adapter, property, value) in overrides.adapter_properties {
            if adapter == self.adapter.name {
                self.adapter.properties.insert(property, value);
            } else {
                tracing::debug!(
                    adapter = %adapter,
                    property = %property,
                    "Ignoring property for inactive adapter"
                );
            }
        }
    }

    /// Check every setting; nothing is connected here
    pub fn validate(&self) -> ConfigResult<()> {
        if self.processor.concurrency == 0 {
            return Err(ConfigurationError::invalid_value(
                "processor.concurrency",
                "0",
                "must be at least 1",
            ));
        }
        if self.processor.wait_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "processor.wait_timeout_ms",
                "0",
                "must be greater than zero",
            ));
        }
        if self.processor.execute_timeout_ms == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "processor.execute_timeout_ms",
                "0",
                "must be greater than zero when set",
            ));
        }
        if self.store.redis_address.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "store.redis_address",
                "",
                "must not be empty",
            ));
        }

        self.adapter_config().map(|_| ())
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            concurrency: self.processor.concurrency,
            wait_timeout: Duration::from_millis(self.processor.wait_timeout_ms),
            requeue_on_failure: self.processor.requeue_on_failure,
            execute_timeout: self.processor.execute_timeout_ms.map(Duration::from_millis),
        }
    }

    /// Resolve the selected adapter and validate its properties against its schema
    pub fn adapter_config(&self) -> ConfigResult<AdapterConfig> {
        let factory = adapter_factory(&self.adapter.name).map_err(|e| {
            ConfigurationError::invalid_value("adapter.name", &self.adapter.name, e.to_string())
        })?;

        let properties: HashMap<String, String> = self
            .adapter
            .properties
            .iter()
            .map(|(name, value)| (normalize_property_name(name), value.clone()))
            .collect();

        factory.schema().config_from(&properties)
    }
}

/// Map `queue_name` style keys (from environment variables) to `queue-name`
pub fn normalize_property_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

/// Parse a duration given as milliseconds (`500`) or with a unit (`500ms`, `2s`, `1m`)
pub fn parse_duration_ms(raw: &str) -> ConfigResult<u64> {
    let raw = raw.trim();
    let invalid = || {
        ConfigurationError::invalid_value("duration", raw, "expected <n>, <n>ms, <n>s or <n>m")
    };

    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits.parse().map_err(|_| invalid())?;

    let multiplier = match unit.trim() {
        "" | "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        _ => return Err(invalid()),
    };
    value.checked_mul(multiplier).ok_or_else(invalid)
}
