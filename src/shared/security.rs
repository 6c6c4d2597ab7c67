use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of an input file (extracted code lists, scraped reports): 20 MB
pub const MAX_INPUT_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Security
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata for {}: {}",
            file_description,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Validates file size is within acceptable limits
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Reads a text input file after the regular-file and size checks
pub fn read_input_file(path: &Path, file_description: &str) -> Result<String> {
    validate_regular_file(path, file_description)?;
    let size = fs::metadata(path)?.len();
    validate_file_size(size, path, MAX_INPUT_FILE_SIZE)?;

    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_description, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_validate_regular_file_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("codes.txt");
        fs::write(&file_path, "AX-100\n").unwrap();

        assert!(validate_regular_file(&file_path, "code list").is_ok());
    }

    #[test]
    fn test_validate_regular_file_is_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = validate_regular_file(temp_dir.path(), "code list");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a regular file"));
    }

    #[test]
    fn test_validate_regular_file_nonexistent() {
        let result = validate_regular_file(Path::new("/nonexistent/codes.txt"), "code list");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_file_size_exceeds_limit() {
        let path = PathBuf::from("/test/codes.txt");
        let result = validate_file_size(MAX_INPUT_FILE_SIZE + 1, &path, MAX_INPUT_FILE_SIZE);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too large"));
    }

    #[test]
    fn test_read_input_file_returns_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("codes.txt");
        fs::write(&file_path, "AX-100\nAX-200\n").unwrap();

        let content = read_input_file(&file_path, "code list").unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
