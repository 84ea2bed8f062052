//! JSON result sink

use crate::extract::SerpRow;
use crate::output::traits::{write_atomically, OutputHandler, OutputResult};
use std::io::Write;
use std::path::PathBuf;

/// Writes rows as a pretty-printed JSON array; absent fields are omitted
pub struct JsonOutput {
    path: PathBuf,
}

impl JsonOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for JsonOutput {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn write_rows(&self, rows: &[SerpRow]) -> OutputResult<PathBuf> {
        write_atomically(&self.path, |file| {
            serde_json::to_writer_pretty(&mut *file, rows)?;
            file.write_all(b"\n")?;
            Ok(())
        })
    }
}
