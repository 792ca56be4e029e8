//! Texture Converter CLI
//!
//! Converts every image under `texture_sources` into a `.texture` package
//! under `texture_library`.

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use texture_converter::config::DEFAULT_CONFIG_FILE;

use commands::convert::ConvertArgs;

#[derive(Debug, Parser)]
#[command(name = "texture-converter", version, about)]
struct Cli {
    /// Config file to read
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert the source tree (default)
    Convert(ConvertArgs),
    /// Check that the encoder and source folder are in place
    Check {
        /// Directory containing texture_sources
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::convert::run(&cli.config, ConvertArgs::default()),
        Some(Commands::Convert(args)) => commands::convert::run(&cli.config, args),
        Some(Commands::Check { base_dir }) => commands::check::run(&cli.config, base_dir),
        Some(Commands::Init { force }) => commands::init::run(&cli.config, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_convert() {
        let cli = Cli::try_parse_from(["texture-converter"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_convert_flags() {
        let cli = Cli::try_parse_from([
            "texture-converter",
            "convert",
            "--base-dir",
            "assets",
            "--encoder",
            "/opt/nvcompress",
            "--timeout",
            "60",
            "--wait",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Convert(args)) => {
                assert_eq!(args.base_dir, Some(PathBuf::from("assets")));
                assert_eq!(args.encoder, Some(PathBuf::from("/opt/nvcompress")));
                assert_eq!(args.timeout, Some(60));
                assert!(args.wait);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["texture-converter", "init", "--config", "x.ini", "--force"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("x.ini"));
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        assert!(
            Cli::try_parse_from(["texture-converter", "convert", "--timeout", "soon"]).is_err()
        );
    }
}
