//! Batch scheduler
//!
//! This module handles:
//! - Spawning one orchestration unit per keyword
//! - Folding rows and statistics in completion order
//! - Progress reporting after every finished keyword
//! - Early termination when the shutdown signal fires

use crate::extract::SerpRow;
use crate::output::{ProcessingStats, ProgressReporter};
use crate::pipeline::coordinator::{process_keyword, KeywordReport};
use crate::pipeline::session::SerpSession;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinSet};

/// Everything a batch produced
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Rows of every finished keyword, in completion order
    pub rows: Vec<SerpRow>,

    pub stats: ProcessingStats,

    /// The shutdown signal fired before every keyword finished
    pub interrupted: bool,

    /// Wall-clock start, used to name output files
    pub started_at: DateTime<Utc>,

    pub elapsed: Duration,

    /// Highest number of requests that were in flight at once
    pub peak_in_flight: usize,
}

type UnitResult = (String, Result<KeywordReport, crate::SerpError>);

/// Runs every keyword through the orchestrator
///
/// All units are spawned up front and share the session's permit pool, so at
/// most `max-concurrent-requests` HTTP requests are in flight at any moment.
/// Completed units are folded one at a time by this loop; no counter is shared
/// between units.
///
/// When `shutdown` resolves, pending units are aborted, the permit pool is
/// closed, and the rows of the keywords that already finished are returned
/// with `interrupted` set.
///
/// # Arguments
///
/// * `session` - Shared per-batch session
/// * `keywords` - Keywords to process
/// * `reporter` - Receives the running statistics after each keyword
/// * `shutdown` - Resolves when the batch should stop early
pub async fn run_batch<F>(
    session: Arc<SerpSession>,
    keywords: Vec<String>,
    reporter: &dyn ProgressReporter,
    shutdown: F,
) -> BatchResult
where
    F: Future<Output = ()>,
{
    let started_at = Utc::now();
    let start_time = Instant::now();
    let mut stats = ProcessingStats::new(keywords.len());
    let mut rows = Vec::new();

    tracing::info!(
        "Starting batch of {} keywords with {} concurrent requests",
        keywords.len(),
        session.limiter().capacity()
    );

    let mut units: JoinSet<UnitResult> = JoinSet::new();
    for keyword in keywords {
        let session = Arc::clone(&session);
        units.spawn(async move {
            let report = process_keyword(&session, &keyword).await;
            (keyword, report)
        });
    }

    tokio::pin!(shutdown);
    let mut interrupted = false;

    loop {
        let joined = tokio::select! {
            biased;
            _ = &mut shutdown, if !interrupted => {
                tracing::warn!(
                    "Shutdown requested; aborting {} pending keywords",
                    units.len()
                );
                interrupted = true;
                session.close();
                units.abort_all();
                continue;
            }
            joined = units.join_next() => joined,
        };

        let Some(joined) = joined else {
            break;
        };

        fold_unit(joined, &mut rows, &mut stats);
        if !interrupted {
            reporter.report(&stats);
        }
    }

    reporter.finish(&stats);

    let elapsed = start_time.elapsed();
    tracing::info!(
        "Batch finished in {:?}: {} completed, {} failed, {} rows",
        elapsed,
        stats.completed,
        stats.failed,
        rows.len()
    );

    BatchResult {
        rows,
        stats,
        interrupted,
        started_at,
        elapsed,
        peak_in_flight: session.limiter().peak(),
    }
}

fn fold_unit(
    joined: Result<UnitResult, JoinError>,
    rows: &mut Vec<SerpRow>,
    stats: &mut ProcessingStats,
) {
    match joined {
        Ok((_, Ok(report))) => {
            stats.record(&report.outcome);
            rows.extend(report.rows);
        }
        Ok((keyword, Err(e))) => {
            tracing::error!("Keyword {:?} aborted: {}", keyword, e);
            stats.record_failure();
        }
        Err(e) if e.is_cancelled() => {
            stats.record_failure();
        }
        Err(e) => {
            tracing::error!("Keyword task panicked: {}", e);
            stats.record_failure();
        }
    }
}
