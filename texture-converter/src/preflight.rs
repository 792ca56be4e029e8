//! Startup checks run once before a batch.
//!
//! Unlike [`crate::ConvertError`], a [`PreflightError`] stops the whole run
//! before any file is touched.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::config::ConverterConfig;
use crate::mapping::SOURCE_ROOT;

/// Conditions that prevent a batch from starting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreflightError {
    /// The encoder executable does not exist.
    #[error("encoder not found at {0}")]
    EncoderMissing(PathBuf),

    /// A library the encoder depends on is missing.
    #[error("encoder dependency not found: {0}")]
    DependencyMissing(PathBuf),

    /// The source folder does not exist.
    #[error("folder {0} does not exist")]
    SourceRootMissing(PathBuf),

    /// The source path exists but is not a folder.
    #[error("{0} is not a folder")]
    SourceRootNotDirectory(PathBuf),

    /// The source folder exists but cannot be listed.
    #[error("folder {path} cannot be read: {message}")]
    SourceRootUnreadable { path: PathBuf, message: String },
}

/// Verify the encoder and the source tree are in place.
///
/// Companion files are looked up in the encoder executable's directory.
pub fn check_requirements(config: &ConverterConfig) -> Result<(), PreflightError> {
    check_encoder(config)?;
    check_source_root(config)?;
    Ok(())
}

/// Verify the encoder executable and its companion files exist.
pub fn check_encoder(config: &ConverterConfig) -> Result<(), PreflightError> {
    let executable = &config.encoder.executable;
    if !executable.is_file() {
        return Err(PreflightError::EncoderMissing(executable.clone()));
    }

    let tool_dir = executable
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_default();
    for name in &config.encoder.required_files {
        let path = tool_dir.join(name);
        if !path.is_file() {
            return Err(PreflightError::DependencyMissing(path));
        }
    }

    debug!(executable = %executable.display(), "Encoder present");
    Ok(())
}

/// Verify `<base_dir>/texture_sources` is an existing, listable folder.
pub fn check_source_root(config: &ConverterConfig) -> Result<(), PreflightError> {
    let root = config.base_dir.join(SOURCE_ROOT);
    if !root.exists() {
        return Err(PreflightError::SourceRootMissing(root));
    }
    if !root.is_dir() {
        return Err(PreflightError::SourceRootNotDirectory(root));
    }
    if let Err(e) = fs::read_dir(&root) {
        return Err(PreflightError::SourceRootUnreadable {
            path: root,
            message: e.to_string(),
        });
    }
    Ok(())
}
