//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::SymbolSet;
use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Quote API round-trip latency benchmark
#[derive(Parser, Debug)]
#[command(name = "quote-bench")]
#[command(version)]
#[command(about = "Measure round-trip latency of repeated quote API calls")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level; overrides --verbose
    #[arg(long, global = true, value_enum, ignore_case = true)]
    pub log_level: Option<LogLevel>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the latency benchmark (default)
    Run(RunArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Number of timed requests
    #[arg(short = 'n', long)]
    pub requests: Option<usize>,

    /// Comma-separated symbols to fetch
    #[arg(short, long)]
    pub symbols: Option<SymbolSet>,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Prime the connection with one untimed request before sampling
    #[arg(long)]
    pub warm_start: bool,

    /// Report format
    #[arg(short, long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "quote-bench.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variables instead
        #[arg(long)]
        env: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Yaml)]
        format: ConfigFormat,
    },

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the discovered config file)
        file: Option<PathBuf>,
    },
}

/// Rendering of `config show`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
}
