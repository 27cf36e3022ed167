// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `fabdeck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fabdeck",
    version,
    about = "Discover Fabric tasks and provision them as Rundeck jobs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Fabdeck.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Fabdeck.toml")]
    pub config: String,

    /// Compile and print job documents without contacting the job server.
    #[arg(long)]
    pub dry_run: bool,

    /// Override `[discovery].timeout_secs` for this run.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FABDECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
