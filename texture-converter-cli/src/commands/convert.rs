//! Convert command - package the whole source tree.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use texture_converter::batch::BatchWalker;
use texture_converter::config::ConverterConfig;
use texture_converter::logging::init_logging;
use texture_converter::preflight::check_requirements;
use tracing::{info, warn};

use crate::error::CliError;
use crate::output::{self, ConsoleObserver};

/// Arguments for the convert command.
#[derive(Debug, Default, Args)]
pub struct ConvertArgs {
    /// Directory containing texture_sources (default: from config, else ".")
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Path to the nvcompress executable
    #[arg(long)]
    pub encoder: Option<PathBuf>,

    /// Seconds to wait for one encoder run before giving up (0 = no limit)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Wait for ENTER before exiting
    #[arg(long)]
    pub wait: bool,
}

impl ConvertArgs {
    /// Apply CLI overrides on top of the loaded config.
    fn apply(&self, mut config: ConverterConfig) -> ConverterConfig {
        if let Some(ref base_dir) = self.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(ref encoder) = self.encoder {
            config.encoder.executable = encoder.clone();
        }
        if let Some(secs) = self.timeout {
            config.encoder.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        config
    }
}

/// Run the convert command.
pub fn run(config_path: &Path, args: ConvertArgs) -> Result<(), CliError> {
    let config = args.apply(super::load_config(config_path)?);
    let _logging = init_logging(&config.logging).map_err(CliError::Logging)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_dir = %config.base_dir.display(),
        encoder = %config.encoder.executable.display(),
        "Starting conversion"
    );

    let outcome = convert(&config);
    output::done(args.wait);
    outcome
}

fn convert(config: &ConverterConfig) -> Result<(), CliError> {
    check_requirements(config)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    let walker = BatchWalker::new(&config.base_dir, Arc::new(config.encoder.build()))
        .with_scratch_path(config.scratch_path())
        .with_cancel_flag(cancel);

    let report = walker.run_with_observer(&mut ConsoleObserver)?;
    output::summary(&report);
    Ok(())
}
