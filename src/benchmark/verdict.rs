//! Qualitative performance verdict
//!
//! Classifies sustained latency and its spread into coarse tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bounds (seconds, exclusive) of the warm-latency tiers
const EXCELLENT_LATENCY: f64 = 0.030;
const GOOD_LATENCY: f64 = 0.040;
const ACCEPTABLE_LATENCY: f64 = 0.050;

/// Upper bounds (seconds, exclusive) of the standard deviation tiers
const EXCELLENT_SPREAD: f64 = 0.005;
const GOOD_SPREAD: f64 = 0.010;

/// Sustained performance tier, judged on the warm mean
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Acceptable,
    NeedsImprovement,
}

impl PerformanceTier {
    pub fn from_warm_mean(warm_mean: f64) -> Self {
        if warm_mean < EXCELLENT_LATENCY {
            Self::Excellent
        } else if warm_mean < GOOD_LATENCY {
            Self::Good
        } else if warm_mean < ACCEPTABLE_LATENCY {
            Self::Acceptable
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Acceptable => "ACCEPTABLE",
            Self::NeedsImprovement => "NEEDS IMPROVEMENT",
        }
    }

    /// One-line status message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => "Sustained performance < 30ms",
            Self::Good => "Sustained performance < 40ms",
            Self::Acceptable => "Sustained performance < 50ms",
            Self::NeedsImprovement => "Sustained performance > 50ms",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Response time stability tier, judged on the standard deviation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyTier {
    Excellent,
    Good,
    Variable,
}

impl ConsistencyTier {
    pub fn from_std_dev(stddev: f64) -> Self {
        if stddev < EXCELLENT_SPREAD {
            Self::Excellent
        } else if stddev < GOOD_SPREAD {
            Self::Good
        } else {
            Self::Variable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Variable => "VARIABLE",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => "Very stable response times",
            Self::Good => "Stable response times",
            Self::Variable => "Network might be unstable",
        }
    }
}

impl fmt::Display for ConsistencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Combined verdict of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub performance: PerformanceTier,
    /// Cold over warm latency ratio; `None` when the warm mean is zero
    pub improvement: Option<f64>,
    pub consistency: ConsistencyTier,
}

impl Verdict {
    /// Judge a run from its cold latency, warm mean, and standard deviation
    pub fn assess(first: f64, warm_mean: f64, stddev: f64) -> Self {
        let improvement = if warm_mean > 0.0 {
            Some(first / warm_mean)
        } else {
            None
        };

        Self {
            performance: PerformanceTier::from_warm_mean(warm_mean),
            improvement,
            consistency: ConsistencyTier::from_std_dev(stddev),
        }
    }
}
