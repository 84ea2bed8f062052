//! Progress reporting
//!
//! The scheduler calls a reporter after every finished keyword. The console
//! reporter rewrites a single stdout line; log output goes to stderr.

use crate::output::stats::ProcessingStats;
use std::io::Write;

/// Receives the running statistics of a batch
pub trait ProgressReporter: Send + Sync {
    /// Called after each keyword finishes
    fn report(&self, stats: &ProcessingStats);

    /// Called once when the batch ends
    fn finish(&self, _stats: &ProcessingStats) {}
}

/// Carriage-return progress line on stdout
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, stats: &ProcessingStats) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r{}", stats.progress_line());
        let _ = stdout.flush();
    }

    fn finish(&self, stats: &ProcessingStats) {
        if stats.processed() > 0 {
            println!();
        }
    }
}

/// Discards progress updates
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _stats: &ProcessingStats) {}
}
