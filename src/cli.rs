// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `guilaunch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "guilaunch",
    version,
    about = "Launch a GUI application, falling back to a virtual display when the current one is unusable.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML). A missing file means defaults.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Executable to launch.
    ///
    /// Takes precedence over `GUILAUNCH_RUN_BINARY` and `[launch].binary`.
    #[arg(long, value_name = "PATH")]
    pub binary: Option<PathBuf>,

    /// Start the child and return immediately instead of waiting for it.
    #[arg(long)]
    pub detached: bool,

    /// Show the child's stderr even while watching for display failures.
    ///
    /// Also enabled by `GUILAUNCH_CHILD_LOG=1`.
    #[arg(long)]
    pub child_logging: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GUILAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved launch plan without starting anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Arguments passed through to the child.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
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
