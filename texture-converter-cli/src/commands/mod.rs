//! CLI command implementations.

pub mod check;
pub mod convert;
pub mod init;

use std::path::Path;

use texture_converter::config::ConverterConfig;

use crate::error::CliError;

/// Load the config file, falling back to defaults when it is absent.
pub fn load_config(path: &Path) -> Result<ConverterConfig, CliError> {
    Ok(ConverterConfig::load_or_default(path)?)
}
