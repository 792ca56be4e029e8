//! Source file classification.

use std::path::Path;

/// How a source file is turned into a compressed container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// PNG, JPG or TGA image handed to the encoder.
    Raster,
    /// DDS container used as-is.
    Precompressed,
    /// Anything else; ignored without error.
    Unsupported,
}

impl SourceKind {
    /// Classify by extension, ignoring case.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png" | "jpg" | "tga") => SourceKind::Raster,
            Some("dds") => SourceKind::Precompressed,
            _ => SourceKind::Unsupported,
        }
    }

    pub fn is_supported(self) -> bool {
        self != SourceKind::Unsupported
    }
}
