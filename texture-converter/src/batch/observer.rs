//! Progress callbacks for a running batch.

use std::path::Path;

use crate::error::ConvertError;
use crate::package::PackagedTexture;

/// Receives progress events from [`super::BatchWalker`].
///
/// Every method has an empty default so callers only implement what they
/// display.
pub trait BatchObserver {
    /// A folder is about to be processed.
    fn folder_started(&mut self, _folder: &Path) {}

    /// A folder's files could not be listed; the batch moves to the next
    /// folder.
    fn folder_failed(&mut self, _folder: &Path, _error: &ConvertError) {}

    /// A file is about to be converted.
    fn file_started(&mut self, _source: &Path) {}

    /// A package was written.
    fn file_packaged(&mut self, _source: &Path, _packaged: &PackagedTexture) {}

    /// A file failed; the batch continues.
    fn file_failed(&mut self, _source: &Path, _error: &ConvertError) {}

    /// A file with an unsupported extension was skipped.
    fn file_ignored(&mut self, _source: &Path) {}
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}
