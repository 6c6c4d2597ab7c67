use crate::shared::Result;
use std::path::Path;

/// InputReader port for the files handed over by external collaborators
///
/// Extracted code lists come from the OCR front-end, structure reports from the
/// reporting system. Both are plain text.
pub trait InputReader {
    /// Reads a list of extracted codes, one per line
    ///
    /// Blank lines and lines starting with `#` are skipped. Codes are returned
    /// as written; normalization happens in the core.
    ///
    /// # Errors
    /// Returns an error if the file is missing, not a regular file or too large
    fn read_extracted_codes(&self, path: &Path) -> Result<Vec<String>>;

    /// Reads a tab-separated structure report
    fn read_structure_report(&self, path: &Path) -> Result<String>;
}
