//! Logging utilities
//!
//! Provides logging configuration and helpers. Logs go to stderr so the
//! report on stdout stays clean.

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    /// Level selected by the `--verbose` flag
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

/// Directive used when `RUST_LOG` is not set
fn default_directive(level: LogLevel) -> String {
    format!("quote_bench={}", level.to_tracing_level())
}

/// Initialize the logger with specified level; `RUST_LOG` overrides it
pub fn init_logger(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("info", false), Ok(LogLevel::Info));
        assert_eq!(LogLevel::from_str("DEBUG", true), Ok(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("warning", false), Ok(LogLevel::Warn));
        assert!(LogLevel::from_str("unknown", true).is_err());
    }

    #[test]
    fn test_verbose_level() {
        assert_eq!(LogLevel::from_verbose(true), LogLevel::Debug);
        assert_eq!(default_directive(LogLevel::from_verbose(false)), "quote_bench=INFO");
    }
}
