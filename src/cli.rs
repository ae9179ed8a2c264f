// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `assetcopy`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "assetcopy",
    version,
    about = "Copy files matched by declarative patterns into a build output directory.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "assetcopy.toml")]
    pub config: String,

    /// Output directory, overriding `[options] output` from the config.
    ///
    /// Relative paths are taken from the current working directory.
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Copy directory and glob matches even if their mtime is unchanged.
    #[arg(long)]
    pub copy_unmodified: bool,

    /// Logging level. Overrides `ASSETCOPY_LOG` when given.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve all patterns and print the destination keys, but don't write
    /// anything to the output directory.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Arguments for running `config` with every override left unset.
    pub fn for_config(config: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            output: None,
            copy_unmodified: false,
            log_level: None,
            dry_run: false,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
