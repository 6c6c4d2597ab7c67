use crate::ports::outbound::InputReader;
use crate::shared::error::BomError;
use crate::shared::security::read_input_file;
use crate::shared::Result;
use std::path::Path;

/// FileSystemReader adapter for the input files of the CLI
///
/// All reads go through the regular-file and size checks of
/// [`crate::shared::security`].
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    fn read(&self, path: &Path, description: &str) -> Result<String> {
        read_input_file(path, description).map_err(|e| {
            BomError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl InputReader for FileSystemReader {
    fn read_extracted_codes(&self, path: &Path) -> Result<Vec<String>> {
        let content = self.read(path, "extracted code list")?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    fn read_structure_report(&self, path: &Path) -> Result<String> {
        self.read(path, "structure report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_extracted_codes_skips_blank_and_comments() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("codes.txt");
        fs::write(&path, "# page 1\nAX-100\n\n  bx-200  \nAX-100\n").unwrap();

        let codes = FileSystemReader::new().read_extracted_codes(&path).unwrap();

        assert_eq!(codes, vec!["AX-100", "bx-200", "AX-100"]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = FileSystemReader::new()
            .read_structure_report(&temp_dir.path().join("absent.tsv"))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Failed to read file"));
        assert!(message.contains("absent.tsv"));
    }

    #[test]
    fn test_directory_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FileSystemReader::new()
            .read_extracted_codes(temp_dir.path())
            .is_err());
    }
}
