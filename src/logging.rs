//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//! Designed for containerized workers where logs go to stdout.
//!
//! - Log level chosen by environment (`METRICS_WORKER_ENV`, then `APP_ENV`)
//!   unless `LOG_LEVEL` or `RUST_LOG` is set
//! - TTY-aware ANSI color output
//! - `LOG_FORMAT=json` switches to one JSON object per line
//!
//! Hot paths carry `correlation_id` as a span field so every line logged
//! while a delivery is handled can be traced back to it.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Output format of the console layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(format) if format.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Initialize console tracing once per process
///
/// Safe to call repeatedly; if another subscriber is already installed (for
/// example by a test harness) it is left in place.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let format = LogFormat::from_env();
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());

        let installed = match format {
            LogFormat::Json => {
                let console_layer = fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_filter(EnvFilter::new(&log_level));
                tracing_subscriber::registry()
                    .with(console_layer)
                    .try_init()
                    .is_ok()
            }
            LogFormat::Text => {
                let console_layer = fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_ansi(use_ansi)
                    .with_filter(EnvFilter::new(&log_level));
                tracing_subscriber::registry()
                    .with(console_layer)
                    .try_init()
                    .is_ok()
            }
        };

        if installed {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                format = ?format,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        } else {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }
    });
}

fn get_environment() -> String {
    std::env::var("METRICS_WORKER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Explicit `LOG_LEVEL` / `RUST_LOG` win over environment defaults
fn get_log_level(environment: &str) -> String {
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        return level.to_lowercase();
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        return level.to_lowercase();
    }

    default_level(environment).to_string()
}

fn default_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
