//! Block-compression encoder abstraction.
//!
//! The converter never compresses pixels itself. Raster sources are handed
//! to a [`ContainerEncoder`], which writes a DDS container to an output
//! path; the batch walker then reads that file back through a
//! [`ScratchContainer`].
//!
//! ```text
//! ┌──────────────┐  source path   ┌──────────────────┐
//! │ BatchWalker  │ ─────────────► │ ContainerEncoder │ (trait)
//! │              │                └────────┬─────────┘
//! │              │  scratch bytes          │ writes
//! │              │ ◄────────────── ScratchContainer
//! └──────────────┘
//! ```
//!
//! # Available Encoders
//!
//! - [`NvcompressEncoder`] - runs NVIDIA's `nvcompress` tool out of process

mod nvcompress;
mod scratch;

use std::path::Path;

use crate::error::ConvertResult;

pub use nvcompress::{NvcompressEncoder, DEFAULT_FORMAT_FLAG};
pub use scratch::ScratchContainer;

/// Produces a compressed container from a raster source image.
///
/// Implementations may block for as long as the encoding takes.
pub trait ContainerEncoder: Send + Sync {
    /// Encode `source` and write the container to `output`.
    ///
    /// Returning `Ok` does not by itself prove a container was written;
    /// callers still treat a missing or empty `output` as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConvertError::EncodeFailure`] if the encoder could
    /// not be run or reported failure.
    fn encode(&self, source: &Path, output: &Path) -> ConvertResult<()>;

    /// Human-readable encoder name for logs.
    fn name(&self) -> &str;
}
