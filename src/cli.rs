// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::Parser;

use crate::types::LogLevel;

/// Command-line arguments for `taskflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskflow",
    version,
    about = "Validate task flows and print the order in which they would be launched.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Taskflow.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Taskflow.toml")]
    pub config: String,

    /// Only print this flow.
    #[arg(long, value_name = "NAME")]
    pub flow: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `[logging] level`, then `TASKFLOW_LOG`, then `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
