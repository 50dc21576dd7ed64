// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `segflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "segflow",
    version,
    about = "Construct a batch-scheduler job graph from segment and site configuration.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Segflow.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Segflow.toml")]
    pub config: String,

    /// Where to write the serialized job graph.
    #[arg(long, value_name = "PATH", default_value = "plan.json")]
    pub output: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SEGFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the coverage report and planned graph
    /// summary, but don't write the plan.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
