//! Batch statistics
//!
//! This module provides the running counters folded by the scheduler and the
//! final summary printed by the binary.

use crate::pipeline::KeywordOutcome;
use std::time::Duration;

/// Running totals for a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Number of keywords in the batch
    pub total: usize,

    /// Keywords whose primary fetch succeeded
    pub completed: usize,

    /// Keywords that failed, panicked or were aborted
    pub failed: usize,

    pub organic_rows: usize,
    pub ai_overview_rows: usize,
    pub ai_mode_rows: usize,

    /// Completed keywords whose AI mode fetch failed
    pub ai_mode_failures: usize,
}

impl ProcessingStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Folds one keyword outcome into the totals
    pub fn record(&mut self, outcome: &KeywordOutcome) {
        match outcome {
            KeywordOutcome::Completed {
                organic_rows,
                ai_overview_rows,
                ai_mode_rows,
                ai_mode_failed,
            } => {
                self.completed += 1;
                self.organic_rows += organic_rows;
                self.ai_overview_rows += ai_overview_rows;
                self.ai_mode_rows += ai_mode_rows;
                if *ai_mode_failed {
                    self.ai_mode_failures += 1;
                }
            }
            KeywordOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Counts a keyword whose unit never produced an outcome
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Keywords finished so far, successfully or not
    pub fn processed(&self) -> usize {
        self.completed + self.failed
    }

    pub fn total_rows(&self) -> usize {
        self.organic_rows + self.ai_overview_rows + self.ai_mode_rows
    }

    /// Share of keywords processed, 0.0 for an empty batch
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed() as f64 / self.total as f64 * 100.0
        }
    }

    /// One-line progress summary
    pub fn progress_line(&self) -> String {
        format!(
            "Progress: {}/{} ({:.1}%) | Success: {} | Failed: {} | AI Overview: {} | Organic: {} | AI Mode: {}",
            self.processed(),
            self.total,
            self.percent(),
            self.completed,
            self.failed,
            self.ai_overview_rows,
            self.organic_rows,
            self.ai_mode_rows
        )
    }
}

/// Prints the final batch summary to stdout
pub fn print_summary(stats: &ProcessingStats, elapsed: Duration) {
    let seconds = elapsed.as_secs_f64();

    println!("{}", "=".repeat(60));
    println!("Completed in {:.1} seconds", seconds);
    println!(
        "Keywords: {} succeeded, {} failed, {} total",
        stats.completed, stats.failed, stats.total
    );
    println!(
        "Rows: {} ({} AI overview, {} organic, {} AI mode)",
        stats.total_rows(),
        stats.ai_overview_rows,
        stats.organic_rows,
        stats.ai_mode_rows
    );
    if stats.ai_mode_failures > 0 {
        println!("AI mode fetch failed for {} keywords", stats.ai_mode_failures);
    }
    if seconds > 0.0 {
        println!(
            "Average: {:.1} keywords/second",
            stats.processed() as f64 / seconds
        );
    }
}
