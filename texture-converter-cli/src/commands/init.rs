//! Init command - write a default configuration file.

use std::path::Path;

use texture_converter::config::ConverterConfig;

use crate::error::CliError;

/// Run the init command.
pub fn run(config_path: &Path, force: bool) -> Result<(), CliError> {
    if config_path.exists() && !force {
        return Err(CliError::AlreadyExists(
            config_path.display().to_string(),
        ));
    }

    ConverterConfig::default().save(config_path)?;

    println!("Configuration file: {}", config_path.display());
    println!();
    println!("Edit this file to point at your nvcompress installation.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
