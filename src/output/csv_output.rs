//! CSV result sink

use crate::extract::{SerpRow, CSV_COLUMNS};
use crate::output::traits::{write_atomically, OutputHandler, OutputResult};
use std::io::Write;
use std::path::PathBuf;

/// Writes rows as CSV with the fixed 21-column header
///
/// The header is written even when there are no rows. Absent values become
/// empty cells.
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for CsvOutput {
    fn format_name(&self) -> &'static str {
        "CSV"
    }

    fn write_rows(&self, rows: &[SerpRow]) -> OutputResult<PathBuf> {
        write_atomically(&self.path, |file| write_csv(file.as_file_mut(), rows))
    }
}

/// Formats rows as CSV into any writer
pub fn write_csv<W: Write>(writer: W, rows: &[SerpRow]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;
    Ok(())
}
