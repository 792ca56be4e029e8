//! Writing packages to the library tree.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::format::TexturePackage;
use crate::dds::{self, Dimensions};
use crate::error::{ConvertError, ConvertResult};

/// Summary of one written package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedTexture {
    /// Path the package was written to.
    pub destination: PathBuf,

    /// Name embedded in the package.
    pub embedded_name: String,

    /// Dimensions read from the container.
    pub dimensions: Dimensions,

    /// Container bytes stored as payload.
    pub payload_length: usize,

    /// Size of the written file.
    pub file_length: usize,
}

/// Assembles packages and writes them atomically.
///
/// The package is written to a sibling `.tmp` file and renamed onto the
/// destination, so a destination file is either absent, the previous
/// version, or complete.
#[derive(Debug, Clone, Default)]
pub struct TexturePackager;

impl TexturePackager {
    pub fn new() -> Self {
        Self
    }

    /// Package `container` and write it to `destination`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::MalformedContainer`] if the dimensions cannot be read
    /// - [`ConvertError::WriteFailure`] for any I/O failure
    pub fn pack(
        &self,
        container: &[u8],
        destination: &Path,
        embedded_name: &str,
    ) -> ConvertResult<PackagedTexture> {
        let dimensions = dds::read_dimensions(container)?;
        self.pack_with_dimensions(container, dimensions, destination, embedded_name)
    }

    /// Package `container` using dimensions the caller already read.
    pub fn pack_with_dimensions(
        &self,
        container: &[u8],
        dimensions: Dimensions,
        destination: &Path,
        embedded_name: &str,
    ) -> ConvertResult<PackagedTexture> {
        let package = TexturePackage::new(embedded_name, dimensions, container)?;
        let bytes = package.to_bytes();

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConvertError::WriteFailure {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        write_atomic(destination, &bytes).map_err(|e| ConvertError::WriteFailure {
            path: destination.to_path_buf(),
            source: e,
        })?;

        debug!(
            destination = %destination.display(),
            bytes = bytes.len(),
            "Package written"
        );

        Ok(PackagedTexture {
            destination: destination.to_path_buf(),
            embedded_name: embedded_name.to_string(),
            dimensions,
            payload_length: container.len(),
            file_length: bytes.len(),
        })
    }
}

/// Temp path used while writing `destination`.
fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_atomic(destination: &Path, bytes: &[u8]) -> io::Result<()> {
    let temp = temp_path(destination);

    let result = (|| {
        let mut file = fs::File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp, destination)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn container(width: u32, height: u32, len: usize) -> Vec<u8> {
        let mut data = vec![0x5Au8; len];
        data[0..4].copy_from_slice(b"DDS ");
        data[12..16].copy_from_slice(&height.to_le_bytes());
        data[16..20].copy_from_slice(&width.to_le_bytes());
        data
    }

    fn word(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_pack_writes_header_and_payload() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("texture_library/foo/bar.texture");
        let data = container(4, 4, 64);
        let name = "texture_library/foo/bar.dds";

        let packaged = TexturePackager::new()
            .pack(&data, &destination, name)
            .unwrap();

        let bytes = fs::read(&destination).unwrap();
        assert_eq!(word(&bytes, 0), name.len() as u32 + 37);
        assert_eq!(word(&bytes, 4), 64);
        assert_eq!(word(&bytes, 8), 4);
        assert_eq!(word(&bytes, 12), 4);
        assert_eq!(bytes.len(), 32 + 2 * name.len() + 1 + 64);
        assert_eq!(&bytes[bytes.len() - 64..], &data[..]);

        assert_eq!(packaged.dimensions, Dimensions::new(4, 4));
        assert_eq!(packaged.payload_length, 64);
        assert_eq!(packaged.file_length, bytes.len());
    }

    #[test]
    fn test_pack_creates_parent_dirs_idempotently() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b/c");
        fs::create_dir_all(&dir).unwrap();

        let data = container(8, 8, 32);
        TexturePackager::new()
            .pack(&data, &dir.join("x.texture"), "x.dds")
            .unwrap();
        TexturePackager::new()
            .pack(&data, &dir.join("y.texture"), "y.dds")
            .unwrap();

        assert!(dir.join("x.texture").exists());
        assert!(dir.join("y.texture").exists());
    }

    #[test]
    fn test_pack_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("t.texture");
        fs::write(&destination, vec![0xFF; 4096]).unwrap();

        let data = container(2, 2, 24);
        TexturePackager::new()
            .pack(&data, &destination, "t.dds")
            .unwrap();

        let bytes = fs::read(&destination).unwrap();
        assert_eq!(bytes.len(), 32 + 2 * 5 + 1 + 24);
    }

    #[test]
    fn test_pack_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("t.texture");

        TexturePackager::new()
            .pack(&container(2, 2, 24), &destination, "t.dds")
            .unwrap();

        assert!(!temp_path(&destination).exists());
    }

    #[test]
    fn test_pack_malformed_container_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let destination = temp.path().join("t.texture");

        let err = TexturePackager::new()
            .pack(&[0u8; 10], &destination, "t.dds")
            .unwrap_err();

        assert!(matches!(err, ConvertError::MalformedContainer(_)));
        assert!(!destination.exists());
    }

    #[test]
    fn test_pack_write_failure() {
        let temp = TempDir::new().unwrap();
        // A regular file where a directory is needed
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let destination = blocker.join("t.texture");

        let err = TexturePackager::new()
            .pack(&container(2, 2, 24), &destination, "t.dds")
            .unwrap_err();

        assert!(matches!(err, ConvertError::WriteFailure { .. }));
    }

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(
            temp_path(Path::new("lib/foo.texture")),
            PathBuf::from("lib/foo.texture.tmp")
        );
    }
}
