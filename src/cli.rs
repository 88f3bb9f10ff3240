//! # Command Line Interface
//!
//! Static options are declared with clap derive; one `--<adapter>-<property>`
//! option per schema property of every known adapter is added at runtime.
//! Only options that were actually passed become configuration overrides.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command, CommandFactory, FromArgMatches, Parser};

use crate::config::{parse_duration_ms, ConfigOverrides};
use crate::messaging::known_adapters;

const ADAPTER_HEADING: &str = "Adapter options";

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "metrics-worker")]
#[command(about = "Consume metric tasks from a queue and record them as sequenced events")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: config/metrics-worker.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of concurrent worker slots [default: 1]
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Idle wait per queue poll, e.g. 500, 500ms, 2s [default: 500ms]
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_arg)]
    pub wait_timeout: Option<u64>,

    /// Redis address as host:port or redis:// URL [default: localhost:6379]
    #[arg(long, value_name = "ADDRESS")]
    pub redis_address: Option<String>,

    /// Queue adapter to consume from (rabbit, memory) [default: rabbit]
    #[arg(long, value_name = "NAME")]
    pub adapter: Option<String>,

    /// Requeue deliveries whose handler failed [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub requeue_on_failure: Option<bool>,

    /// Deadline for a single handler call, e.g. 5s (unbounded when unset)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_arg)]
    pub execute_timeout: Option<u64>,

    /// `(adapter, property, value)` for every adapter option passed
    #[arg(skip)]
    pub adapter_properties: Vec<(String, String, String)>,
}

fn parse_duration_arg(raw: &str) -> Result<u64, String> {
    parse_duration_ms(raw).map_err(|e| e.to_string())
}

impl Cli {
    /// The full command, including generated adapter options
    pub fn command_with_adapters() -> Command {
        let mut command = Self::command();
        for factory in known_adapters() {
            let schema = factory.schema();
            for property in &schema.properties {
                let option = property.option_name(schema.adapter);
                command = command.arg(
                    Arg::new(option.clone())
                        .long(option)
                        .value_name(property.kind.as_str().to_ascii_uppercase())
                        .help(format!(
                            "{} [default: {}]",
                            property.description, property.default
                        ))
                        .help_heading(ADAPTER_HEADING),
                );
            }
        }
        command
    }

    /// Parse the process arguments, exiting with usage on error
    pub fn parse_args() -> Self {
        Self::parse_with_adapters_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    pub fn parse_with_adapters_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command_with_adapters().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        cli.adapter_properties = collect_adapter_properties(&matches);
        Ok(cli)
    }

    /// Options that were passed explicitly, as configuration overrides
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            concurrency: self.concurrency,
            wait_timeout_ms: self.wait_timeout,
            redis_address: self.redis_address.clone(),
            adapter: self.adapter.clone(),
            requeue_on_failure: self.requeue_on_failure,
            execute_timeout_ms: self.execute_timeout,
            adapter_properties: self.adapter_properties.clone(),
        }
    }
}

fn collect_adapter_properties(matches: &ArgMatches) -> Vec<(String, String, String)> {
    let mut properties = Vec::new();
    for factory in known_adapters() {
        let schema = factory.schema();
        for property in &schema.properties {
            let option = property.option_name(schema.adapter);
            if let Some(value) = matches.get_one::<String>(&option) {
                properties.push((
                    schema.adapter.to_string(),
                    property.name.to_string(),
                    value.clone(),
                ));
            }
        }
    }
    properties
}
