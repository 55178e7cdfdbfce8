//! Spreadsheet export.
//!
//! Maps accumulated vacancies into a fixed eight-column schema and writes a
//! single xlsx workbook with a styled table. The output filename is derived
//! from the search query so repeated runs for the same query overwrite the
//! same file.

use std::path::{Path, PathBuf};

pub mod xlsx;

pub use xlsx::{write_workbook, ExportRow};

/// Suffix appended to the sanitized query to form the output filename.
pub const FILE_SUFFIX: &str = "_vacancies.xlsx";

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Workbook construction failed
    #[error("workbook error: {0}")]
    Workbook(String),

    /// Writing the file failed
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Derive a filesystem-safe base name from a search query.
///
/// Every character outside `[alphanumeric, '_', '-']` becomes `_`, then
/// trailing underscores are stripped. Alphanumeric is Unicode-aware, so
/// non-Latin queries keep their letters.
pub fn sanitize_query(query: &str) -> String {
    let safe: String = query
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    safe.trim_end_matches('_').to_string()
}

/// Full output path for a query's workbook inside `dir`.
pub fn workbook_path(dir: &Path, query: &str) -> PathBuf {
    dir.join(format!("{}{}", sanitize_query(query), FILE_SUFFIX))
}
