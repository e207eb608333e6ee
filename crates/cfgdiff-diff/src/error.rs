//! Error types for the diff crate.

use std::path::PathBuf;

/// Errors that can occur while enumerating or rendering comparisons.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Recursive mode was requested with one directory and one file.
    #[error("cannot compare folders and files")]
    DirectoryModeMismatch { from: PathBuf, to: PathBuf },

    /// A directory was given without recursive mode.
    #[error("{0} is a directory (use --recursive to compare directories)")]
    IsADirectory(PathBuf),

    /// Neither side of a comparison exists.
    #[error("neither {from} nor {to} exists")]
    MissingInputs { from: PathBuf, to: PathBuf },

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
