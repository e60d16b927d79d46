//! Benchmark execution
//!
//! Issues requests strictly one after another and records the round-trip
//! time of each.

use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};

use super::metrics::SampleSequence;
use crate::http::QuoteSource;
use crate::models::SymbolSet;
use crate::utils::Timer;

/// Progress is reported after every this many completed requests
pub const PROGRESS_INTERVAL: usize = 10;

/// Progress notification passed to the observer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Requests completed so far
    pub completed: usize,
    /// Round-trip time of the latest request
    pub last: Duration,
}

/// Run `count` sequential fetches of `query` and collect their timings.
///
/// The first failed fetch aborts the run; no partial sequence is returned.
pub async fn run_benchmark<S, F>(
    client: &S,
    query: &SymbolSet,
    count: usize,
    mut on_progress: F,
) -> Result<SampleSequence>
where
    S: QuoteSource,
    F: FnMut(Progress),
{
    if count == 0 {
        anyhow::bail!("Request count must be positive");
    }

    info!(
        "Running {} sequential requests for {} symbols [{}]",
        count,
        query.len(),
        query
    );

    let mut sequence = SampleSequence::with_capacity(count);
    sequence.set_started_at(Utc::now());
    let total = Timer::start("benchmark loop");

    for i in 0..count {
        let timer = Timer::start(format!("request {}", i + 1));
        client
            .fetch_quotes(query)
            .await
            .with_context(|| format!("Request {} of {} failed", i + 1, count))?;
        let sample = sequence.push(timer.stop());

        if (i + 1) % PROGRESS_INTERVAL == 0 {
            on_progress(Progress {
                completed: sample.request,
                last: sample.elapsed,
            });
        }
    }

    sequence.set_wall_clock(total.stop());
    debug!(
        "Collected {} samples in {:.4}s",
        sequence.len(),
        sequence.wall_clock().as_secs_f64()
    );

    Ok(sequence)
}

/// Issue one untimed request so the connection is established before
/// sampling starts
pub async fn prime<S: QuoteSource>(client: &S, query: &SymbolSet) -> Result<()> {
    let timer = Timer::start("priming request");
    client
        .fetch_quotes(query)
        .await
        .context("Priming request failed")?;
    info!("Connection primed in {:.4}s", timer.stop().as_secs_f64());
    Ok(())
}
