//! Output module for batch results
//!
//! This module handles:
//! - Writing rows as CSV and JSON, atomically
//! - Naming output files after the batch start time
//! - Batch statistics and progress reporting

mod csv_output;
mod json_output;
mod progress;
pub mod stats;
mod traits;

pub use csv_output::{write_csv, CsvOutput};
pub use json_output::JsonOutput;
pub use progress::{ConsoleProgress, ProgressReporter, SilentProgress};
pub use stats::{print_summary, ProcessingStats};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::extract::SerpRow;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Timestamp format used in output file names
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Destination files of one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

impl OutputPaths {
    /// `<dir>/csv/serp_results_<ts>.csv` and `<dir>/json/serp_results_<ts>.json`
    pub fn for_batch(directory: &Path, started_at: DateTime<Utc>) -> Self {
        let stamp = started_at.format(FILE_TIMESTAMP_FORMAT);
        Self {
            csv: directory
                .join("csv")
                .join(format!("serp_results_{}.csv", stamp)),
            json: directory
                .join("json")
                .join(format!("serp_results_{}.json", stamp)),
        }
    }
}

/// Writes the rows of a batch to every sink
///
/// # Arguments
///
/// * `directory` - Output root directory
/// * `started_at` - Batch start time, used in the file names
/// * `rows` - Rows to write, in order
///
/// # Returns
///
/// * `Ok(OutputPaths)` - Both files were written
/// * `Err(OutputError)` - A sink failed; files already written are kept
pub fn write_batch_outputs(
    directory: &Path,
    started_at: DateTime<Utc>,
    rows: &[SerpRow],
) -> OutputResult<OutputPaths> {
    let paths = OutputPaths::for_batch(directory, started_at);
    let handlers: Vec<Box<dyn OutputHandler>> = vec![
        Box::new(CsvOutput::new(&paths.csv)),
        Box::new(JsonOutput::new(&paths.json)),
    ];

    for handler in &handlers {
        let path = handler.write_rows(rows)?;
        tracing::info!(
            "Wrote {} rows as {} to {}",
            rows.len(),
            handler.format_name(),
            path.display()
        );
    }

    Ok(paths)
}
