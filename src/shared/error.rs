use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems and shop-floor scripts to distinguish between
/// a clean result, a result with discrepancies, and an outright failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - structures identical, or document matches its BOM
    Success = 0,
    /// Differences between structures, or missing/extra codes in a document
    DiscrepanciesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (gateway failure, timeout, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::DiscrepanciesDetected => write!(f, "Discrepancies Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Failures of the resolution walks (structure and ancestors).
///
/// Every variant aborts the whole call: no partial tree is ever handed back.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The root has no children and no attributes of its own
    #[error("Article not found: {code}\n\n💡 Hint: Check the article code, it has neither components nor a description")]
    NotFound { code: String },

    #[error("Relation query for {code} timed out after {after:?}\n\n💡 Hint: Raise query_timeout_ms or check the database load")]
    Timeout { code: String, after: Duration },

    #[error("Resolution of {code} exceeded the caller deadline; no partial structure was returned")]
    DeadlineExceeded { code: String },

    /// The structure goes deeper than the configured `max_depth`
    #[error("Structure of {code} is deeper than {max_depth} levels; no partial structure was returned\n\n💡 Hint: Raise max_depth if the article really is this deep")]
    DepthExceeded { code: String, max_depth: usize },

    #[error("Relation gateway failed while querying {code}\nDetails: {details}")]
    Gateway { code: String, details: String },
}

impl ResolutionError {
    pub fn gateway(code: impl Into<String>, error: anyhow::Error) -> Self {
        ResolutionError::Gateway {
            code: code.into(),
            details: format!("{:#}", error),
        }
    }
}

/// Failures of the structure comparison.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("At least two structures are required to compare, got {given}")]
    InsufficientInput { given: usize },
}

/// Application-level errors for files, configuration and the relation database.
#[derive(Debug, Error)]
pub enum BomError {
    #[error("Relation database not found: {path}\n\n💡 Hint: {suggestion}")]
    DatabaseNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to open relation database: {path}\nDetails: {details}")]
    DatabaseOpenError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for settings and CLI values
    #[error("Validation error: {message}")]
    Validation { message: String },
}
