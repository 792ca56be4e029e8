//! CLI error types.

use std::fmt;
use std::io;

use texture_converter::config::ConfigError;
use texture_converter::preflight::PreflightError;
use texture_converter::ConvertError;

/// Errors that end the program with a non-zero status.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded or saved.
    Config(ConfigError),

    /// Startup requirements are not met.
    Preflight(PreflightError),

    /// Failed to set up logging.
    Logging(io::Error),

    /// The batch could not start.
    Batch(ConvertError),

    /// Refused to overwrite an existing file.
    AlreadyExists(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Preflight(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Batch(e) => write!(f, "Batch failed: {}", e),
            CliError::AlreadyExists(path) => {
                write!(f, "{} already exists (use --force to overwrite)", path)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Preflight(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Batch(e) => Some(e),
            CliError::AlreadyExists(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<PreflightError> for CliError {
    fn from(e: PreflightError) -> Self {
        CliError::Preflight(e)
    }
}

impl From<ConvertError> for CliError {
    fn from(e: ConvertError) -> Self {
        CliError::Batch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn test_preflight_display_passes_through() {
        let err: CliError =
            PreflightError::SourceRootMissing(PathBuf::from("texture_sources")).into();
        assert_eq!(err.to_string(), "folder texture_sources does not exist");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_already_exists_display() {
        let err = CliError::AlreadyExists("texture_converter.ini".to_string());
        assert!(err.to_string().contains("--force"));
        assert!(err.source().is_none());
    }
}
