//! Batch conversion of a source tree.
//!
//! [`BatchWalker`] visits every folder below `texture_sources`, classifies
//! each file by extension ([`SourceKind`]), obtains a compressed container
//! for it and writes the package into the mirrored `texture_library`
//! folder. Failures are recorded per file in the [`BatchReport`]; the walk
//! always continues with the next file.

mod observer;
mod report;
mod source;
mod walker;

pub use observer::{BatchObserver, NoopObserver};
pub use report::{BatchReport, FileFailure};
pub use source::SourceKind;
pub use walker::{BatchWalker, DEFAULT_SCRATCH_FILE};
