//! Console progress output.

use std::io::{self, Write};
use std::path::Path;

use console::style;
use texture_converter::batch::{BatchObserver, BatchReport};
use texture_converter::package::PackagedTexture;
use texture_converter::ConvertError;

/// Prints batch progress the way the converter always has: folder names in
/// yellow, each file followed by its dimensions in green, failures in red.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl BatchObserver for ConsoleObserver {
    fn folder_started(&mut self, folder: &Path) {
        println!("{}", style(folder.display()).yellow());
    }

    fn folder_failed(&mut self, _folder: &Path, error: &ConvertError) {
        println!("    {}", style(error).red());
    }

    fn file_started(&mut self, source: &Path) {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        print!("    {}", name);
        io::stdout().flush().ok();
    }

    fn file_packaged(&mut self, _source: &Path, packaged: &PackagedTexture) {
        println!(" {}", style(packaged.dimensions).green());
    }

    fn file_failed(&mut self, _source: &Path, error: &ConvertError) {
        println!(" {}", style(error).red());
    }
}

/// Print the end-of-run summary.
pub fn summary(report: &BatchReport) {
    println!();
    if report.is_clean() {
        println!("{}", style(report).green());
    } else {
        println!("{}", style(report).yellow());
        for failure in &report.failures {
            println!(
                "  {} {}",
                style(failure.source.display()).red(),
                failure.error
            );
        }
    }
}

/// Print an error line.
pub fn error(message: &str) {
    eprintln!("{}", style(message).red());
}

/// Print the closing line, optionally waiting for ENTER.
pub fn done(wait: bool) {
    if wait {
        println!("Done. Press ENTER to exit.");
        let mut line = String::new();
        io::stdin().read_line(&mut line).ok();
    } else {
        println!("Done.");
    }
}
