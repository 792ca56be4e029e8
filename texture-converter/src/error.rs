//! Error types for texture conversion.
//!
//! Every [`ConvertError`] is scoped to a single source file: the batch
//! walker records it and moves on to the next file. Errors that must stop
//! the whole batch before it starts live in [`crate::preflight`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for per-file conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting one source file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Source path does not follow the `texture_sources/...` convention.
    #[error("invalid source path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Compressed container is too short or otherwise unreadable.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// External encoder is missing, crashed, or produced no output.
    #[error("encoding {path} failed: {reason}")]
    EncodeFailure { path: PathBuf, reason: String },

    /// Failed to read a source or intermediate file.
    #[error("failed to read {path}: {source}")]
    ReadFailure { path: PathBuf, source: io::Error },

    /// Failed to write the destination package.
    #[error("failed to write {path}: {source}")]
    WriteFailure { path: PathBuf, source: io::Error },
}

impl ConvertError {
    /// Create an [`ConvertError::InvalidPath`] error.
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConvertError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an [`ConvertError::EncodeFailure`] error.
    pub fn encode_failure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConvertError::EncodeFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InvalidPath { .. } => "invalid-path",
            ConvertError::MalformedContainer(_) => "malformed-container",
            ConvertError::EncodeFailure { .. } => "encode-failure",
            ConvertError::ReadFailure { .. } => "read-failure",
            ConvertError::WriteFailure { .. } => "write-failure",
        }
    }
}
