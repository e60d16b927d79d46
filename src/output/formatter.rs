//! Output formatters for benchmark reports
//!
//! Provides the human-readable text report and JSON renderings.

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::benchmark::{Progress, Report};
use crate::models::SymbolSet;

const RULE_WIDTH: usize = 50;

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    #[value(alias = "table")]
    Text,
    Json,
    #[value(alias = "jsonpretty")]
    JsonPretty,
}

impl OutputFormat {
    /// Whether the run banner and progress lines belong on stdout
    pub fn is_text(&self) -> bool {
        *self == OutputFormat::Text
    }
}

/// Report formatter
pub struct ReportFormatter {
    format: OutputFormat,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a report in the configured format
    pub fn format(&self, report: &Report) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(format_report(report)),
            OutputFormat::Json => {
                serde_json::to_string(report).context("Failed to serialize report")
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(report).context("Failed to serialize report")
            }
        }
    }
}

fn banner(output: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    output.push_str(&format!("{rule}\n{title}\n{rule}\n\n"));
}

fn line(output: &mut String, label: &str, value: impl std::fmt::Display) {
    output.push_str(&format!("{label:<21} {value}\n"));
}

/// Seconds with the millisecond equivalent
fn secs_ms(secs: f64) -> String {
    format!("{:.4} seconds ({:.2} ms)", secs, secs * 1000.0)
}

/// Banner printed before the first request
pub fn format_run_header(count: usize, symbols: &SymbolSet) -> String {
    let mut output = String::new();
    banner(&mut output, &format!("QUOTE API {count}-REQUEST BENCHMARK"));
    output.push_str(&format!("Symbols: {symbols}\n"));
    output
}

/// Progress line printed every few requests
pub fn format_progress(progress: &Progress) -> String {
    format!(
        "Completed {} requests... Last request: {:.4}s",
        progress.completed,
        progress.last.as_secs_f64()
    )
}

/// Human-readable multi-section report
pub fn format_report(report: &Report) -> String {
    let mut output = String::from("\n");

    banner(&mut output, "RESULTS");
    if let Some(started_at) = report.started_at {
        line(&mut output, "Started:", started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    line(&mut output, "Total Requests:", report.count);
    line(
        &mut output,
        "Total Time:",
        format!("{:.4} seconds", report.total),
    );
    line(&mut output, "Average per Request:", secs_ms(report.mean));
    output.push('\n');

    line(&mut output, "First Request:", secs_ms(report.first));
    line(
        &mut output,
        &format!("Warm Average (2-{}):", report.count),
        secs_ms(report.warm_mean),
    );
    output.push('\n');

    line(&mut output, "Min Time:", secs_ms(report.min));
    line(&mut output, "Max Time:", secs_ms(report.max));
    line(&mut output, "Median Time:", secs_ms(report.median));
    line(&mut output, "Std Deviation:", secs_ms(report.stddev));
    output.push('\n');

    banner(&mut output, "BREAKDOWN BY REQUEST RANGES");
    for range in &report.range_means {
        output.push_str(&format!(
            "{:<18}{:.2} ms\n",
            format!("Requests {}:", range.label()),
            range.mean * 1000.0
        ));
    }
    output.push('\n');

    banner(&mut output, "PERFORMANCE ANALYSIS");
    let verdict = &report.verdict;
    output.push_str(&format!(
        "Status: {}! {}\n",
        verdict.performance,
        verdict.performance.message()
    ));
    match verdict.improvement {
        Some(factor) => output.push_str(&format!(
            "Connection Reuse Improvement: {factor:.2}x faster\n"
        )),
        None => output.push_str("Connection Reuse Improvement: n/a (warm average is zero)\n"),
    }
    output.push_str(&format!(
        "Consistency: {}! {}\n",
        verdict.consistency,
        verdict.consistency.message()
    ));

    output.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::{compute_report, SampleSequence};
    use std::time::Duration;

    fn outlier_report() -> Report {
        let mut secs = vec![0.100];
        secs.extend([0.020; 9]);
        compute_report(&SampleSequence::from_secs(&secs)).unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TEXT", true), Ok(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("table", false), Ok(OutputFormat::Text));
        assert_eq!(
            OutputFormat::from_str("json-pretty", false),
            Ok(OutputFormat::JsonPretty)
        );
        assert!(OutputFormat::from_str("xml", true).is_err());
    }

    #[test]
    fn test_text_report_sections() {
        let text = format_report(&outlier_report());

        let sections = ["RESULTS", "BREAKDOWN BY REQUEST RANGES", "PERFORMANCE ANALYSIS"];
        let positions: Vec<usize> = sections.iter().map(|s| text.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(text.contains("Total Requests:       10\n"));
        assert!(text.contains("First Request:        0.1000 seconds (100.00 ms)\n"));
        assert!(text.contains("Warm Average (2-10):  0.0200 seconds (20.00 ms)\n"));
        assert!(text.contains("Requests 1-10:    28.00 ms\n"));
        assert!(text.contains("Status: EXCELLENT! Sustained performance < 30ms\n"));
        assert!(text.contains("Connection Reuse Improvement: 5.00x faster\n"));
        assert!(text.contains("Consistency: VARIABLE! Network might be unstable\n"));
    }

    #[test]
    fn test_zero_warm_mean_prints_na() {
        let mut report = outlier_report();
        report.verdict.improvement = None;
        assert!(format_report(&report).contains("Connection Reuse Improvement: n/a"));
    }

    #[test]
    fn test_json_report() {
        let report = outlier_report().with_symbols(["NSE:SBIN-EQ"]);
        let json = ReportFormatter::new(OutputFormat::Json).format(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 10);
        assert_eq!(value["verdict"]["performance"], "EXCELLENT");
        assert_eq!(value["verdict"]["consistency"], "VARIABLE");
        assert_eq!(value["symbols"][0], "NSE:SBIN-EQ");
        assert_eq!(value["range_means"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_progress_line() {
        let progress = Progress {
            completed: 20,
            last: Duration::from_micros(23_456),
        };
        assert_eq!(
            format_progress(&progress),
            "Completed 20 requests... Last request: 0.0235s"
        );
    }

    #[test]
    fn test_run_header() {
        let header = format_run_header(100, &SymbolSet::default());
        assert!(header.contains("QUOTE API 100-REQUEST BENCHMARK"));
        assert!(header.contains("NSE:SBIN-EQ, NSE:RELIANCE-EQ, NSE:TCS-EQ"));
    }
}
