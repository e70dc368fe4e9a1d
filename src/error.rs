//! Error types for the savepoint library
//!
//! Every expected outcome of a repository operation that is not a success is
//! a variant here, including the informational ones (`EmptyStaging`,
//! `NoChanges`, `AlreadyInitialized`) that callers report to the user rather
//! than treat as failures. Errors carry enough context (path, identifier) to
//! diagnose a failure from the message alone.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the savepoint library
pub type Result<T> = std::result::Result<T, SavepointError>;

/// Main error type for all savepoint operations
#[derive(Debug, Error)]
pub enum SavepointError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No control directory exists at the working-directory root
    #[error("repository not initialized (run 'savepoint init' first)")]
    NotInitialized,

    /// The repository layout already exists
    #[error("repository already exists")]
    AlreadyInitialized,

    /// The persisted metadata could not be parsed
    #[error("metadata is corrupt: {0}")]
    CorruptMetadata(#[source] serde_json::Error),

    /// A commit was attempted with nothing staged
    #[error("nothing to commit (staging area is empty)")]
    EmptyStaging,

    /// The staging area is identical to the last commit
    #[error("no changes detected since the last commit")]
    NoChanges,

    /// No snapshot exists for the given identifier
    #[error("commit not found: {0}")]
    SnapshotNotFound(String),

    /// A copy into staging, a snapshot, or the working directory failed
    #[error("failed to copy {path:?}: {source}")]
    Copy {
        /// Path being copied when the failure occurred
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Removal of a working-directory or staging entry failed
    #[error("failed to remove {path:?}: {source}")]
    Remove {
        /// Path being removed when the failure occurred
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl SavepointError {
    /// Create a copy error for `path`
    pub fn copy(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SavepointError::Copy {
            path: path.into(),
            source,
        }
    }

    /// Create a removal error for `path`
    pub fn remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SavepointError::Remove {
            path: path.into(),
            source,
        }
    }

    /// Check if this error is an expected, user-reported outcome rather
    /// than a hard failure
    ///
    /// Informational outcomes leave the repository state untouched and map
    /// to exit code 0 in the CLI.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            SavepointError::AlreadyInitialized
                | SavepointError::EmptyStaging
                | SavepointError::NoChanges
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SavepointError::SnapshotNotFound("abc123".to_string());
        assert_eq!(err.to_string(), "commit not found: abc123");
    }

    #[test]
    fn test_informational_classification() {
        assert!(SavepointError::EmptyStaging.is_informational());
        assert!(SavepointError::NoChanges.is_informational());
        assert!(SavepointError::AlreadyInitialized.is_informational());
        assert!(!SavepointError::NotInitialized.is_informational());
        assert!(!SavepointError::SnapshotNotFound("x".to_string()).is_informational());
    }

    #[test]
    fn test_copy_error_context() {
        let err = SavepointError::copy(
            "some/file.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("some/file.txt"));
    }
}
