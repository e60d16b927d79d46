//! quote-bench - Quote API Latency Benchmark
//!
//! A CLI tool that measures the round-trip latency of repeated calls to a
//! market quote REST API and grades the result.
//!
//! ## Features
//!
//! - Strictly sequential requests over one reused connection pool
//! - Cold vs warm comparison of the first request against the rest
//! - Mean, median, min/max, sample standard deviation, and per-range means
//! - Text or JSON report
//!
//! ## Usage
//!
//! ```bash
//! # Run 100 requests with credentials from the environment
//! export QUOTE_BENCH_CLIENT_ID=ZYXABCDEF-100
//! export QUOTE_BENCH_ACCESS_TOKEN=eyJhbGc...
//! quote-bench
//!
//! # Fewer requests, custom symbols, JSON output
//! quote-bench run -n 50 --symbols NSE:SBIN-EQ,NSE:TCS-EQ --format json
//!
//! # Write an example config file
//! quote-bench config init
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;

mod benchmark;
mod cli;
mod config;
mod http;
mod models;
mod output;
mod utils;

use benchmark::{compute_report, prime, run_benchmark};
use cli::{Args, Command, ConfigAction, ConfigFormat, RunArgs};
use config::{BenchConfig, EnvConfig};
use http::QuoteClient;
use output::{format_progress, format_run_header, OutputFormat, ReportFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = args.log_level.unwrap_or_else(|| LogLevel::from_verbose(args.verbose));
    init_logger(level);

    match args.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(run_args) => {
            let config = resolve_config(args.config.as_deref(), &run_args)?;
            run(config, run_args.format.unwrap_or_default()).await?;
        }
        Command::Config(config_args) => {
            manage_config(args.config.as_deref(), config_args.action)?;
        }
    }

    Ok(())
}

/// Defaults, then config file, then environment, then command-line flags
fn load_config(path: Option<&Path>) -> Result<BenchConfig> {
    let env = EnvConfig::load();
    let path = path.or(env.config_file.as_deref().map(Path::new));

    let mut config = BenchConfig::load_or_default(path)?;
    config.apply_env(&env);
    Ok(config)
}

fn resolve_config(path: Option<&Path>, args: &RunArgs) -> Result<BenchConfig> {
    let mut config = load_config(path)?;

    if let Some(requests) = args.requests {
        config.requests = requests;
    }
    if let Some(symbols) = &args.symbols {
        config.symbols = symbols.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }
    if args.warm_start {
        config.cold_start = false;
    }

    config.validate_for_run()?;
    Ok(config)
}

async fn run(config: BenchConfig, format: OutputFormat) -> Result<()> {
    let text = format.is_text();
    if text {
        println!("{}", format_run_header(config.requests, &config.symbols));
    }

    // A new client starts with an empty connection pool, so the first timed
    // request pays for DNS, TCP, and TLS setup unless primed below.
    let client = QuoteClient::new(&config.credentials, &config.api)?;
    if config.cold_start {
        info!("Cold start: first request includes connection setup");
    } else {
        prime(&client, &config.symbols).await?;
    }

    let samples = run_benchmark(&client, &config.symbols, config.requests, |progress| {
        if text {
            println!("{}", format_progress(&progress));
        } else {
            info!("{}", format_progress(&progress));
        }
    })
    .await?;

    let report = compute_report(&samples)?.with_symbols(config.symbols.iter());
    println!("{}", ReportFormatter::new(format).format(&report)?);

    Ok(())
}

fn manage_config(path: Option<&Path>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    output.display()
                );
            }

            BenchConfig::example().save(&output)?;
            println!("✓ Configuration file created: {}", output.display());
            println!("\nEdit the file to set your API credentials.");
        }

        ConfigAction::Show { env, format } => {
            if env {
                EnvConfig::load().print_summary();
                println!();
                config::print_env_help();
            } else {
                let config = load_config(path)?.redacted();
                let output = match format {
                    ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
                    ConfigFormat::Yaml => serde_yaml::to_string(&config)?,
                };
                println!("{output}");
            }
        }

        ConfigAction::Validate { file } => {
            let file = file
                .or_else(|| path.map(Path::to_path_buf))
                .or_else(config::find_config)
                .ok_or_else(|| anyhow::anyhow!("No configuration file found"))?;

            match BenchConfig::load(&file) {
                Ok(config) => {
                    println!("✓ Configuration file is valid: {}", file.display());
                    if !config.credentials.is_complete() {
                        println!("  ⚠ Credentials are not set; provide them via environment");
                    }
                }
                Err(e) => {
                    println!("✗ Configuration file is invalid: {}", file.display());
                    println!("  Error: {e:#}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
