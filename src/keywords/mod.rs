//! Keyword source
//!
//! Keywords are read once at batch start from a plain text file, one keyword
//! per line. Surrounding whitespace is trimmed and blank lines are skipped;
//! input order is preserved.

use crate::SerpError;
use std::path::Path;

/// Loads the keyword list from a file
///
/// # Arguments
///
/// * `path` - Path to the keyword file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - At least one keyword, in file order
/// * `Err(SerpError::KeywordsMissing)` - The file does not exist
/// * `Err(SerpError::NoKeywords)` - The file contains no non-blank line
/// * `Err(SerpError::Io)` - The file exists but could not be read
pub fn load_keywords(path: &Path) -> Result<Vec<String>, SerpError> {
    if !path.exists() {
        return Err(SerpError::KeywordsMissing {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let keywords = parse_keywords(&content);

    if keywords.is_empty() {
        return Err(SerpError::NoKeywords {
            path: path.display().to_string(),
        });
    }

    tracing::debug!("Loaded {} keywords from {}", keywords.len(), path.display());
    Ok(keywords)
}

/// Splits text into keywords: one per non-blank line, trimmed
pub fn parse_keywords(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
