//! Latency samples and statistical reduction
//!
//! Turns a completed sample sequence into a [`Report`]: central tendency,
//! spread, cold/warm comparison, and per-range means.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::verdict::Verdict;

/// Number of consecutive requests averaged into one range bucket
pub const BUCKET_SIZE: usize = 10;

/// Minimum number of samples needed for a report
pub const MIN_SAMPLES: usize = 2;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Statistics errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("At least {required} samples are required, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },
}

/// A single request timing
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// 1-based request number
    pub request: usize,
    /// Round-trip time of the request
    pub elapsed: Duration,
}

impl Sample {
    pub fn new(request: usize, elapsed: Duration) -> Self {
        Self { request, elapsed }
    }
}

/// Samples of one run, in request order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SampleSequence {
    samples: Vec<Sample>,
    /// Wall-clock span of the whole sampling loop
    wall_clock: Duration,
    /// When the first request was issued
    started_at: Option<DateTime<Utc>>,
}

impl SampleSequence {
    /// Create an empty sequence with room for `count` samples
    pub fn with_capacity(count: usize) -> Self {
        Self {
            samples: Vec::with_capacity(count),
            wall_clock: Duration::ZERO,
            started_at: None,
        }
    }

    /// Build a sequence from raw durations, numbering requests from 1.
    ///
    /// The wall clock is taken as the sum of the durations.
    pub fn from_durations(durations: impl IntoIterator<Item = Duration>) -> Self {
        let samples: Vec<Sample> = durations
            .into_iter()
            .enumerate()
            .map(|(i, d)| Sample::new(i + 1, d))
            .collect();
        let wall_clock = samples.iter().map(|s| s.elapsed).sum();

        Self {
            samples,
            wall_clock,
            started_at: None,
        }
    }

    /// Build a sequence from durations given in seconds
    pub fn from_secs(secs: &[f64]) -> Self {
        Self::from_durations(secs.iter().map(|s| Duration::from_secs_f64(*s)))
    }

    /// Append the next sample
    pub fn push(&mut self, elapsed: Duration) -> Sample {
        let sample = Sample::new(self.samples.len() + 1, elapsed);
        self.samples.push(sample);
        sample
    }

    pub(crate) fn set_wall_clock(&mut self, wall_clock: Duration) {
        self.wall_clock = wall_clock;
    }

    pub(crate) fn set_started_at(&mut self, started_at: DateTime<Utc>) {
        self.started_at = Some(started_at);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn wall_clock(&self) -> Duration {
        self.wall_clock
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Durations in whole nanoseconds, in request order
    pub fn nanos(&self) -> Vec<u128> {
        self.samples.iter().map(|s| s.elapsed.as_nanos()).collect()
    }
}

/// Mean latency over a contiguous block of requests
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeMean {
    /// First request in the block (1-based, inclusive)
    pub first: usize,
    /// Last request in the block (1-based, inclusive)
    pub last: usize,
    /// Mean latency in seconds
    pub mean: f64,
}

impl RangeMean {
    /// Number of samples in the block
    pub fn request_count(&self) -> usize {
        self.last - self.first + 1
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.first, self.last)
    }
}

/// Aggregate statistics of a completed run. All times are in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Number of requests measured
    pub count: usize,
    /// Wall-clock span of the sampling loop
    pub total: f64,
    pub mean: f64,
    /// Cold (first) request
    pub first: f64,
    /// Mean of every request after the first
    pub warm_mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Sample standard deviation (N - 1)
    pub stddev: f64,
    pub range_means: Vec<RangeMean>,
    pub verdict: Verdict,
    /// Symbols queried on every request
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Attach the queried symbols
    pub fn with_symbols(mut self, symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }
}

/// Reduce a completed sample sequence into a report
pub fn compute_report(sequence: &SampleSequence) -> Result<Report, StatsError> {
    let values = sequence.nanos();
    if values.len() < MIN_SAMPLES {
        return Err(StatsError::InsufficientSamples {
            required: MIN_SAMPLES,
            actual: values.len(),
        });
    }

    let first = values[0];
    let warm_mean = mean(&values[1..]);
    let mean = mean(&values);
    let stddev = sample_std_dev(&values, mean);

    let mut sorted = values.clone();
    sorted.sort_unstable();

    let first = to_secs(first as f64);
    let warm_mean = to_secs(warm_mean);
    let stddev = to_secs(stddev);

    Ok(Report {
        count: values.len(),
        total: sequence.wall_clock().as_secs_f64(),
        mean: to_secs(mean),
        first,
        warm_mean,
        min: to_secs(sorted[0] as f64),
        max: to_secs(sorted[sorted.len() - 1] as f64),
        median: to_secs(median(&sorted)),
        stddev,
        range_means: range_means(&values, BUCKET_SIZE),
        verdict: Verdict::assess(first, warm_mean, stddev),
        symbols: Vec::new(),
        started_at: sequence.started_at(),
    })
}

// Reductions run on integer nanoseconds so that equal durations give an
// exact mean and a zero spread.

fn to_secs(nanos: f64) -> f64 {
    nanos / NANOS_PER_SEC
}

fn mean(values: &[u128]) -> f64 {
    values.iter().sum::<u128>() as f64 / values.len() as f64
}

/// Median of an already sorted, non-empty slice
fn median(sorted: &[u128]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn sample_std_dev(values: &[u128], mean: f64) -> f64 {
    let sq_sum: f64 = values.iter().map(|&x| (x as f64 - mean).powi(2)).sum();
    (sq_sum / (values.len() - 1) as f64).sqrt()
}

/// Mean of each consecutive `size`-sample block, in seconds. A trailing
/// short block is averaged over the samples it actually holds.
fn range_means(values: &[u128], size: usize) -> Vec<RangeMean> {
    values
        .chunks(size)
        .enumerate()
        .map(|(i, block)| RangeMean {
            first: i * size + 1,
            last: i * size + block.len(),
            mean: to_secs(mean(block)),
        })
        .collect()
}
