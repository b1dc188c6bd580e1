//! Error types for ccmeter
//!
//! This module defines the error types used throughout the ccmeter workspace.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Per-line and per-file failures are normally swallowed close to where they
//! happen and only recorded in an [`ErrorSummary`](crate::diagnostics::ErrorSummary);
//! the variants here exist so those records carry a precise [`ErrorKind`].
//!
//! # Example
//!
//! ```
//! use ccmeter_core::error::{CcmeterError, ErrorKind, Result};
//!
//! fn example_function() -> Result<()> {
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//!
//! let err = example_function().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::FileReadFailed);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for ccmeter operations
#[derive(Error, Debug)]
pub enum CcmeterError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base or root path cannot be used
    #[error("Invalid path: {}", .0.display())]
    PathInvalid(PathBuf),

    /// The projects directory does not exist
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A log file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    FileReadFailed {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A line or file could not be parsed
    #[error("Parse error in {}{}: {error}", .file.display(), .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    ParsingFailed {
        /// The file that caused the error
        file: PathBuf,
        /// One-based line number, when the failure is line-level
        line: Option<usize>,
        /// The error message
        error: String,
    },

    /// File content is not valid text
    #[error("Failed to decode {}: {error}", .path.display())]
    DecodingFailed {
        /// The file that could not be decoded
        path: PathBuf,
        /// The error message
        error: String,
    },

    /// Access to a path was refused
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// A resource budget was exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Data was structurally valid but semantically broken
    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    /// An operation ran past its deadline
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// No Claude data directories found
    #[error("No Claude data directories found")]
    NoClaudeDirectory,

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`CcmeterError`]
///
/// Used to group errors in diagnostics and to decide whether a failure is
/// worth skipping past or should end the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    PathInvalid,
    DirectoryNotFound,
    FileReadFailed,
    ParsingFailed,
    DecodingFailed,
    PermissionDenied,
    QuotaExceeded,
    CorruptedData,
    Timeout,
    Configuration,
}

impl ErrorKind {
    /// Whether a run can continue by skipping the failing unit or retrying
    ///
    /// Permission and missing-path errors need user intervention.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::FileReadFailed
                | Self::ParsingFailed
                | Self::DecodingFailed
                | Self::CorruptedData
                | Self::QuotaExceeded
                | Self::Timeout
        )
    }

    /// Short hint shown next to diagnostics
    pub fn recovery_suggestion(self) -> &'static str {
        match self {
            Self::PathInvalid => "check the configured Claude data directory",
            Self::DirectoryNotFound => "no usage history yet, or point --claude-dir at the right place",
            Self::FileReadFailed => "the file was skipped; it may be locked or truncated",
            Self::ParsingFailed => "malformed records were skipped",
            Self::DecodingFailed => "the file is not valid UTF-8 and was skipped",
            Self::PermissionDenied => "grant read access to the Claude data directory",
            Self::QuotaExceeded => "retry with a smaller batch",
            Self::CorruptedData => "the affected records were skipped",
            Self::Timeout => "retry later",
            Self::Configuration => "fix the command line or configuration file",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PathInvalid => "path invalid",
            Self::DirectoryNotFound => "directory not found",
            Self::FileReadFailed => "file read failed",
            Self::ParsingFailed => "parsing failed",
            Self::DecodingFailed => "decoding failed",
            Self::PermissionDenied => "permission denied",
            Self::QuotaExceeded => "quota exceeded",
            Self::CorruptedData => "corrupted data",
            Self::Timeout => "timeout",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

impl CcmeterError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(e) => match e.kind() {
                std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                std::io::ErrorKind::InvalidData => ErrorKind::DecodingFailed,
                std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
                _ => ErrorKind::FileReadFailed,
            },
            Self::Json(_) => ErrorKind::ParsingFailed,
            Self::PathInvalid(_) | Self::NoClaudeDirectory => ErrorKind::PathInvalid,
            Self::DirectoryNotFound(_) => ErrorKind::DirectoryNotFound,
            Self::FileReadFailed { .. } => ErrorKind::FileReadFailed,
            Self::ParsingFailed { .. } => ErrorKind::ParsingFailed,
            Self::DecodingFailed { .. } => ErrorKind::DecodingFailed,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            Self::CorruptedData(_) => ErrorKind::CorruptedData,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::InvalidDate(_)
            | Self::InvalidTimezone(_)
            | Self::InvalidArgument(_)
            | Self::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Shorthand for `self.kind().is_recoverable()`
    pub fn is_recoverable(&self) -> bool {
        self.kind().is_recoverable()
    }

    /// Map an IO error on `path` into the most specific variant
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileReadFailed { path, source },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::InvalidData => Self::DecodingFailed {
                path,
                error: source.to_string(),
            },
            std::io::ErrorKind::TimedOut => Self::Timeout(Duration::ZERO),
            _ => Self::FileReadFailed { path, source },
        }
    }
}

/// Convenience type alias for Results in ccmeter
pub type Result<T> = std::result::Result<T, CcmeterError>;
