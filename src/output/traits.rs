//! Output handler traits and types
//!
//! This module defines the trait interface for result sinks and the
//! atomic write helper they share.

use crate::extract::SerpRow;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result sinks
///
/// A handler writes the complete row set of one batch to a single file.
pub trait OutputHandler {
    /// Short name of the format, used in log lines
    fn format_name(&self) -> &'static str;

    /// Writes every row and returns the path of the finished file
    fn write_rows(&self, rows: &[SerpRow]) -> OutputResult<PathBuf>;
}

/// Writes a file through a temporary sibling and renames it into place
///
/// Readers of `path` see either the previous file or the complete new one.
/// Missing parent directories are created.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> OutputResult<PathBuf>
where
    F: FnOnce(&mut NamedTempFile) -> OutputResult<()>,
{
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    write(&mut file)?;
    file.as_file().sync_all()?;
    file.persist(path)?;

    Ok(path.to_path_buf())
}
