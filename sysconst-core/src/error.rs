//! Typed error handling for sysconst.
//!
//! Every error returned here has already been rendered through the
//! caller's [`ErrorHandler`](crate::diag::ErrorHandler) with position
//! context. The variants carry enough structure for callers that only
//! need a machine-actionable outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sysconst operations.
#[derive(Error, Debug)]
pub enum SysconstError {
    /// Extraction reported one or more problems; no info was produced.
    #[error("constant extraction failed with {errors} error(s)")]
    Extract { errors: usize },

    /// A constant file contained malformed or duplicate lines.
    #[error("failed to decode const file {file}: {errors} error(s)")]
    Decode { file: String, errors: usize },

    /// One or more matched constant files failed to decode.
    #[error("invalid const files: {}", .failed.join(", "))]
    ConstFiles { failed: Vec<String> },

    /// The glob pattern could not be resolved.
    #[error("failed to find const files for {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },

    /// The glob pattern resolved to no files.
    #[error("no const files matched by glob {pattern:?}")]
    NoMatch { pattern: String },

    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Two inputs bind the same constant to different values.
    #[error("different values for const {name:?}: {value} vs {previous}")]
    Conflict {
        name: String,
        value: u64,
        previous: u64,
    },
}

impl SysconstError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Whether processing stopped at the first occurrence.
    ///
    /// Duplicate and malformed-input failures are non-fatal per occurrence:
    /// they are collected over a full pass before the call fails.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Pattern { .. } | Self::NoMatch { .. } | Self::Io { .. } | Self::Conflict { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for sysconst results.
pub type SysconstResult<T> = Result<T, SysconstError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> SysconstResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> SysconstResult<T> {
        self.map_err(|e| SysconstError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = SysconstError::io(
            PathBuf::from("/sys/linux/amd64.const"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, SysconstError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/sys/linux/amd64.const")));
        assert!(err.to_string().contains("/sys/linux/amd64.const"));
    }

    #[test]
    fn test_conflict_message() {
        let err = SysconstError::Conflict {
            name: "O_RDWR".to_string(),
            value: 2,
            previous: 3,
        };
        assert_eq!(err.to_string(), "different values for const \"O_RDWR\": 2 vs 3");
    }

    #[test]
    fn test_is_fatal() {
        assert!(SysconstError::NoMatch { pattern: "*.const".into() }.is_fatal());
        assert!(!SysconstError::Extract { errors: 2 }.is_fatal());
        assert!(!SysconstError::Decode { file: "a.const".into(), errors: 1 }.is_fatal());
    }

    #[test]
    fn test_const_files_lists_failures() {
        let err = SysconstError::ConstFiles {
            failed: vec!["a.const".into(), "b.const".into()],
        };
        assert_eq!(err.to_string(), "invalid const files: a.const, b.const");
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let sysconst_result = result.with_path("/missing/file.const");
        assert!(sysconst_result.is_err());
    }
}
