//! Scoped handle on the intermediate container file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{ConvertError, ConvertResult};

/// The single intermediate container file shared by every source file.
///
/// Acquiring the handle removes whatever a previous file (or a previous
/// run) left behind, and dropping it removes the file again, whichever
/// way processing ended.
#[derive(Debug)]
pub struct ScratchContainer {
    path: PathBuf,
}

impl ScratchContainer {
    /// Take the scratch location, clearing any stale file.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::WriteFailure`] if a stale file exists and
    /// cannot be removed.
    pub fn acquire(path: impl Into<PathBuf>) -> ConvertResult<Self> {
        let path = path.into();
        remove_if_present(&path).map_err(|e| ConvertError::WriteFailure {
            path: path.clone(),
            source: e,
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fill the scratch file with a verbatim copy of `source`.
    pub fn copy_from(&self, source: &Path) -> ConvertResult<()> {
        fs::copy(source, &self.path)
            .map(|_| ())
            .map_err(|e| ConvertError::ReadFailure {
                path: source.to_path_buf(),
                source: e,
            })
    }

    /// Read the container an encoder wrote for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::EncodeFailure`] if no file was produced or it
    /// is empty, and [`ConvertError::ReadFailure`] if it cannot be read.
    pub fn read(&self, source: &Path) -> ConvertResult<Vec<u8>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConvertError::encode_failure(
                    source,
                    "encoder produced no output",
                ));
            }
            Err(e) => {
                return Err(ConvertError::ReadFailure {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        if data.is_empty() {
            return Err(ConvertError::encode_failure(
                source,
                "encoder produced an empty container",
            ));
        }
        Ok(data)
    }

    /// Read back a container placed by [`Self::copy_from`].
    ///
    /// No encoder ran, so an empty copy is returned as is and left for the
    /// header reader to reject as malformed.
    pub fn read_copy(&self) -> ConvertResult<Vec<u8>> {
        fs::read(&self.path).map_err(|e| ConvertError::ReadFailure {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl Drop for ScratchContainer {
    fn drop(&mut self) {
        if let Err(e) = remove_if_present(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove scratch container");
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_removes_stale_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scratch.dds");
        fs::write(&path, b"stale").unwrap();

        let scratch = ScratchContainer::acquire(&path).unwrap();
        assert!(!scratch.path().exists());
    }

    #[test]
    fn test_drop_removes_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("scratch.dds");

        {
            let scratch = ScratchContainer::acquire(&path).unwrap();
            fs::write(scratch.path(), b"data").unwrap();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_read_missing_is_encode_failure() {
        let temp = TempDir::new().unwrap();
        let scratch = ScratchContainer::acquire(temp.path().join("s.dds")).unwrap();

        let err = scratch.read(Path::new("src.png")).unwrap_err();
        assert!(matches!(err, ConvertError::EncodeFailure { .. }));
        assert!(err.to_string().contains("src.png"));
    }

    #[test]
    fn test_read_empty_is_encode_failure() {
        let temp = TempDir::new().unwrap();
        let scratch = ScratchContainer::acquire(temp.path().join("s.dds")).unwrap();
        fs::write(scratch.path(), b"").unwrap();

        let err = scratch.read(Path::new("src.png")).unwrap_err();
        assert!(matches!(err, ConvertError::EncodeFailure { .. }));
    }

    #[test]
    fn test_copy_from_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("in.dds");
        let bytes: Vec<u8> = (0..=255).collect();
        fs::write(&source, &bytes).unwrap();

        let scratch = ScratchContainer::acquire(temp.path().join("s.dds")).unwrap();
        scratch.copy_from(&source).unwrap();
        assert_eq!(scratch.read(&source).unwrap(), bytes);
    }

    #[test]
    fn test_read_copy_keeps_empty_container() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("empty.dds");
        fs::write(&source, b"").unwrap();

        let scratch = ScratchContainer::acquire(temp.path().join("s.dds")).unwrap();
        scratch.copy_from(&source).unwrap();
        assert!(scratch.read_copy().unwrap().is_empty());
    }

    #[test]
    fn test_copy_from_missing_source() {
        let temp = TempDir::new().unwrap();
        let scratch = ScratchContainer::acquire(temp.path().join("s.dds")).unwrap();

        let err = scratch.copy_from(&temp.path().join("nope.dds")).unwrap_err();
        assert!(matches!(err, ConvertError::ReadFailure { .. }));
    }
}
