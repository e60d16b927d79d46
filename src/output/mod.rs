//! Output formatting module
//!
//! Provides the text and JSON renderings of a benchmark report.

mod formatter;

pub use formatter::{format_progress, format_run_header, OutputFormat, ReportFormatter};
