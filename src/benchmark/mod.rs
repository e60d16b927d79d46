//! Latency benchmarking
//!
//! Samples sequential round trips to the quote API, reduces them into
//! descriptive statistics, and grades the result.

mod metrics;
mod runner;
mod verdict;

pub use metrics::{compute_report, Report, SampleSequence};
pub use runner::{prime, run_benchmark, Progress};
