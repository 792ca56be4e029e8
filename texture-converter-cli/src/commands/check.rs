//! Check command - verify startup requirements without converting.

use std::path::{Path, PathBuf};

use console::style;
use texture_converter::config::ConverterConfig;
use texture_converter::mapping::SOURCE_ROOT;
use texture_converter::preflight::check_requirements;

use crate::error::CliError;

/// Run the check command.
pub fn run(config_path: &Path, base_dir: Option<PathBuf>) -> Result<(), CliError> {
    let mut config = super::load_config(config_path)?;
    if let Some(base_dir) = base_dir {
        config.base_dir = base_dir;
    }

    check_requirements(&config)?;

    println!("Encoder:        {}", config.encoder.executable.display());
    println!("Source folder:  {}", source_folder(&config).display());
    println!("{}", style("All requirements met.").green());
    Ok(())
}

fn source_folder(config: &ConverterConfig) -> PathBuf {
    config.base_dir.join(SOURCE_ROOT)
}
