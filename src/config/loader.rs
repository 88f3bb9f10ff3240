//! Configuration Loader
//!
//! Layers configuration sources with the `config` crate, lowest precedence
//! first:
//!
//! 1. built-in defaults ([`WorkerConfig::default`])
//! 2. a TOML file (`config/metrics-worker.toml` when present, or an explicit path)
//! 3. environment variables `METRICS_WORKER__<SECTION>__<KEY>`
//!
//! Command line overrides are applied on top by the caller.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;

use super::error::ConfigResult;
use super::WorkerConfig;

/// File read when no explicit path is given (optional)
pub const DEFAULT_CONFIG_FILE: &str = "config/metrics-worker.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "METRICS_WORKER";

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Read this file instead of the default; it must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Use a different environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load the layered configuration
    ///
    /// The result is not validated; call [`WorkerConfig::validate`] after
    /// applying command line overrides.
    pub fn load(&self) -> ConfigResult<WorkerConfig> {
        let defaults = Config::try_from(&WorkerConfig::default())?;

        let (path, required) = match &self.file {
            Some(path) => (path.as_path(), true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        debug!(
            file = %path.display(),
            required = required,
            env_prefix = %self.env_prefix,
            "Loading worker configuration"
        );

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn unique_prefix(tag: &str) -> String {
        format!("MW_LOADER_TEST_{tag}_{}", std::process::id())
    }

    #[test]
    fn test_missing_default_file_falls_back_to_defaults() {
        let loaded = ConfigLoader::new()
            .with_env_prefix(unique_prefix("DEFAULTS"))
            .load()
            .unwrap();
        assert_eq!(loaded.processor.concurrency, 1);
        assert_eq!(loaded.processor.wait_timeout_ms, 500);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new()
            .with_file(dir.path().join("absent.toml"))
            .with_env_prefix(unique_prefix("ABSENT"))
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[processor]
concurrency = 3
wait_timeout_ms = 250

[store]
redis_address = "redis.internal:6380"

[adapter]
name = "memory"

[adapter.properties]
capacity = 50
"#
        )
        .unwrap();

        let loaded = ConfigLoader::new()
            .with_file(file.path())
            .with_env_prefix(unique_prefix("FILE"))
            .load()
            .unwrap();

        assert_eq!(loaded.processor.concurrency, 3);
        assert_eq!(loaded.processor.wait_timeout_ms, 250);
        assert!(!loaded.processor.requeue_on_failure);
        assert_eq!(loaded.store.redis_address, "redis.internal:6380");
        assert_eq!(loaded.adapter.name, "memory");
        assert_eq!(loaded.adapter.properties["capacity"], "50");
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[processor]\nconcurrency = 3\n").unwrap();

        let prefix = unique_prefix("ENV");
        std::env::set_var(format!("{prefix}__PROCESSOR__CONCURRENCY"), "6");

        let loaded = ConfigLoader::new()
            .with_file(file.path())
            .with_env_prefix(&prefix)
            .load()
            .unwrap();

        std::env::remove_var(format!("{prefix}__PROCESSOR__CONCURRENCY"));
        assert_eq!(loaded.processor.concurrency, 6);
    }
}
