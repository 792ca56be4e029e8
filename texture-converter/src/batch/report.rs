//! Outcome of a batch run.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConvertError;
use crate::package::PackagedTexture;

/// A source file that could not be converted.
#[derive(Debug)]
pub struct FileFailure {
    pub source: PathBuf,
    pub error: ConvertError,
}

/// Everything a batch run did.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Folders whose direct children were processed.
    pub folders_visited: usize,

    /// Packages written, in processing order, with their source paths.
    pub packaged: Vec<(PathBuf, PackagedTexture)>,

    /// Files skipped because of their extension.
    pub ignored: usize,

    /// Files that failed.
    pub failures: Vec<FileFailure>,

    /// Whether the run stopped early on request.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn packaged_count(&self) -> usize {
        self.packaged.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} folders, {} packaged, {} failed, {} ignored",
            self.folders_visited,
            self.packaged.len(),
            self.failures.len(),
            self.ignored
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_clean() {
        let report = BatchReport::default();
        assert!(report.is_clean());
        assert_eq!(report.packaged_count(), 0);
    }

    #[test]
    fn test_failure_makes_unclean() {
        let mut report = BatchReport::default();
        report.failures.push(FileFailure {
            source: PathBuf::from("texture_sources/a/b.png"),
            error: ConvertError::encode_failure("texture_sources/a/b.png", "no output"),
        });
        assert!(!report.is_clean());
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn test_display() {
        let report = BatchReport {
            folders_visited: 3,
            ignored: 2,
            cancelled: true,
            ..Default::default()
        };
        assert_eq!(
            report.to_string(),
            "3 folders, 0 packaged, 0 failed, 2 ignored (cancelled)"
        );
    }
}
