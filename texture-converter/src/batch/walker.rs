//! Sequential source-tree walker.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::observer::{BatchObserver, NoopObserver};
use super::report::{BatchReport, FileFailure};
use super::source::SourceKind;
use crate::dds;
use crate::encoder::{ContainerEncoder, ScratchContainer};
use crate::error::{ConvertError, ConvertResult};
use crate::mapping::{self, SOURCE_ROOT};
use crate::package::{PackagedTexture, TexturePackager};

/// Default name of the intermediate container file, relative to the base
/// directory.
pub const DEFAULT_SCRATCH_FILE: &str = "texture_converter.dds";

/// Walks `<base>/texture_sources` and packages every supported file into
/// `<base>/texture_library`.
///
/// Processing is strictly sequential: one file is encoded, inspected and
/// packaged before the next one starts, and all of them share one scratch
/// file.
///
/// Only subfolders of the source root are visited; files lying directly in
/// `texture_sources` are not converted.
pub struct BatchWalker {
    base_dir: PathBuf,
    scratch_path: PathBuf,
    encoder: Arc<dyn ContainerEncoder>,
    packager: TexturePackager,
    cancel: Option<Arc<AtomicBool>>,
}

impl BatchWalker {
    /// Create a walker rooted at `base_dir`, the directory that contains
    /// `texture_sources`.
    pub fn new(base_dir: impl Into<PathBuf>, encoder: Arc<dyn ContainerEncoder>) -> Self {
        let base_dir = base_dir.into();
        let scratch_path = base_dir.join(DEFAULT_SCRATCH_FILE);
        Self {
            base_dir,
            scratch_path,
            encoder,
            packager: TexturePackager::new(),
            cancel: None,
        }
    }

    /// Use a different intermediate container file.
    pub fn with_scratch_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_path = path.into();
        self
    }

    /// Stop before the next file once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn source_root(&self) -> PathBuf {
        self.base_dir.join(SOURCE_ROOT)
    }

    pub fn scratch_path(&self) -> &Path {
        &self.scratch_path
    }

    /// Run the batch without progress callbacks.
    pub fn run(&self) -> ConvertResult<BatchReport> {
        self.run_with_observer(&mut NoopObserver)
    }

    /// Run the batch, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Only a failure to list the source root itself is returned; every
    /// per-file and per-folder error lands in the report.
    pub fn run_with_observer(
        &self,
        observer: &mut dyn BatchObserver,
    ) -> ConvertResult<BatchReport> {
        let source_root = self.source_root();
        let mut report = BatchReport::default();

        let folders = discover_folders(&source_root)?;
        debug!(count = folders.len(), root = %source_root.display(), "Discovered folders");

        'folders: for folder in folders {
            if !folder.starts_with(&source_root) {
                debug!(folder = %folder.display(), "Skipping folder outside source root");
                continue;
            }

            let relative_folder = self.relative(&folder);
            observer.folder_started(relative_folder);
            report.folders_visited += 1;

            let files = match list_files(&folder) {
                Ok(files) => files,
                Err(error) => {
                    warn!(folder = %relative_folder.display(), error = %error, "Failed to list folder");
                    observer.folder_failed(relative_folder, &error);
                    report.failures.push(FileFailure {
                        source: relative_folder.to_path_buf(),
                        error,
                    });
                    continue;
                }
            };

            for file in files {
                if self.is_cancelled() {
                    info!("Batch cancelled");
                    report.cancelled = true;
                    break 'folders;
                }

                let relative = self.relative(&file).to_path_buf();
                if !SourceKind::from_path(&file).is_supported() {
                    debug!(file = %relative.display(), "Ignoring unsupported file");
                    observer.file_ignored(&relative);
                    report.ignored += 1;
                    continue;
                }

                observer.file_started(&relative);
                match self.process_file(&file, &relative) {
                    Ok(packaged) => {
                        info!(
                            source = %relative.display(),
                            destination = %packaged.destination.display(),
                            dimensions = %packaged.dimensions,
                            "Packaged texture"
                        );
                        observer.file_packaged(&relative, &packaged);
                        report.packaged.push((relative, packaged));
                    }
                    Err(error) => {
                        warn!(source = %relative.display(), kind = error.kind(), error = %error, "Conversion failed");
                        observer.file_failed(&relative, &error);
                        report.failures.push(FileFailure {
                            source: relative,
                            error,
                        });
                    }
                }
            }
        }

        info!(summary = %report, "Batch finished");
        Ok(report)
    }

    /// Convert one supported source file.
    ///
    /// `relative` is the path below the base directory and drives the
    /// destination mapping.
    pub fn process_file(&self, file: &Path, relative: &Path) -> ConvertResult<PackagedTexture> {
        let mapping = mapping::derive(relative)?;

        // Dropped at the end of this call, clearing the file on every path
        let scratch = ScratchContainer::acquire(&self.scratch_path)?;
        let container = match SourceKind::from_path(file) {
            SourceKind::Raster => {
                self.encoder.encode(file, scratch.path())?;
                scratch.read(file)?
            }
            SourceKind::Precompressed => {
                scratch.copy_from(file)?;
                scratch.read_copy()?
            }
            SourceKind::Unsupported => {
                return Err(ConvertError::invalid_path(file, "unsupported extension"));
            }
        };
        let dimensions = dds::read_dimensions(&container)?;
        if !dds::has_dds_magic(&container) {
            warn!(source = %relative.display(), "Container does not start with DDS magic");
        }

        let destination = self.base_dir.join(&mapping.destination);
        self.packager.pack_with_dimensions(
            &container,
            dimensions,
            &destination,
            &mapping.embedded_name,
        )
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.base_dir).unwrap_or(path)
    }
}

/// Every folder below `root`, depth first, sorted by name. `root` itself is
/// not included.
///
/// A folder whose subfolders cannot be listed is still returned; listing
/// its files fails later and is reported there.
fn discover_folders(root: &Path) -> ConvertResult<Vec<PathBuf>> {
    let mut folders = Vec::new();
    let mut pending = sorted_entries(root, true).map_err(|e| ConvertError::ReadFailure {
        path: root.to_path_buf(),
        source: e,
    })?;
    pending.reverse();

    while let Some(folder) = pending.pop() {
        match sorted_entries(&folder, true) {
            Ok(children) => pending.extend(children.into_iter().rev()),
            Err(e) => warn!(folder = %folder.display(), error = %e, "Failed to list subfolders"),
        }
        folders.push(folder);
    }

    Ok(folders)
}

/// Files directly inside `folder`, sorted by name.
fn list_files(folder: &Path) -> ConvertResult<Vec<PathBuf>> {
    sorted_entries(folder, false).map_err(|e| ConvertError::ReadFailure {
        path: folder.to_path_buf(),
        source: e,
    })
}

/// Entries of `dir` that are folders (or regular files), sorted by name.
///
/// Symlinks are followed. A linked folder that resolves to `dir` or one of
/// its parents is skipped so the walk cannot loop.
fn sorted_entries(dir: &Path, directories: bool) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let mut file_type = entry.file_type()?;
        if file_type.is_symlink() {
            let path = entry.path();
            match fs::metadata(&path) {
                Ok(target) => file_type = target.file_type(),
                Err(e) => {
                    debug!(link = %path.display(), error = %e, "Skipping dangling symlink");
                    continue;
                }
            }
            if directories && file_type.is_dir() && links_to_ancestor(dir, &path) {
                warn!(link = %path.display(), "Skipping symlink that loops back to a parent folder");
                continue;
            }
        }
        let wanted = if directories {
            file_type.is_dir()
        } else {
            file_type.is_file()
        };
        if wanted {
            entries.push(entry.path());
        }
    }
    entries.sort();
    Ok(entries)
}

fn links_to_ancestor(parent: &Path, link: &Path) -> bool {
    match (fs::canonicalize(parent), fs::canonicalize(link)) {
        (Ok(parent), Ok(target)) => parent.starts_with(target),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Encoder writing a fixed container, remembering what it was asked for.
    struct FixedEncoder {
        container: Vec<u8>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl FixedEncoder {
        fn new(width: u32, height: u32, len: usize) -> Self {
            let mut container = vec![0u8; len];
            container[0..4].copy_from_slice(b"DDS ");
            container[12..16].copy_from_slice(&height.to_le_bytes());
            container[16..20].copy_from_slice(&width.to_le_bytes());
            Self {
                container,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ContainerEncoder for FixedEncoder {
        fn encode(&self, source: &Path, output: &Path) -> ConvertResult<()> {
            self.calls.lock().unwrap().push(source.to_path_buf());
            fs::write(output, &self.container).unwrap();
            Ok(())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn touch(base: &Path, relative: &str, contents: &[u8]) {
        let path = base.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_discover_folders_depth_first_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("texture_sources");
        for dir in ["b", "a/y", "a/x", "c"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }

        let folders = discover_folders(&root).unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|f| f.strip_prefix(&root).unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a", "a/x", "a/y", "b", "c"]);
    }

    #[test]
    fn test_discover_missing_root_is_error() {
        let temp = TempDir::new().unwrap();
        let err = discover_folders(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConvertError::ReadFailure { .. }));
    }

    #[test]
    fn test_root_level_files_are_not_converted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "texture_sources/top.png", b"x");
        touch(temp.path(), "texture_sources/sub/inner.png", b"x");

        let encoder = Arc::new(FixedEncoder::new(4, 4, 64));
        let walker = BatchWalker::new(temp.path(), encoder.clone());
        let report = walker.run().unwrap();

        assert_eq!(report.packaged_count(), 1);
        assert!(temp.path().join("texture_library/sub/inner.texture").exists());
        assert!(!temp.path().join("texture_library/top.texture").exists());
        assert_eq!(encoder.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_scratch_removed_after_run() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "texture_sources/a/one.png", b"x");
        fs::write(temp.path().join(DEFAULT_SCRATCH_FILE), b"stale").unwrap();

        let walker = BatchWalker::new(temp.path(), Arc::new(FixedEncoder::new(4, 4, 64)));
        walker.run().unwrap();

        assert!(!walker.scratch_path().exists());
    }

    #[test]
    fn test_cancel_flag_stops_before_first_file() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "texture_sources/a/one.png", b"x");

        let flag = Arc::new(AtomicBool::new(true));
        let walker = BatchWalker::new(temp.path(), Arc::new(FixedEncoder::new(4, 4, 64)))
            .with_cancel_flag(flag);
        let report = walker.run().unwrap();

        assert!(report.cancelled);
        assert_eq!(report.packaged_count(), 0);
        assert!(!temp.path().join("texture_library").exists());
    }

    #[test]
    fn test_custom_scratch_path() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "texture_sources/a/one.dds", &FixedEncoder::new(8, 2, 40).container);
        let scratch = temp.path().join("work/scratch.dds");
        fs::create_dir_all(scratch.parent().unwrap()).unwrap();

        let walker = BatchWalker::new(temp.path(), Arc::new(FixedEncoder::new(4, 4, 64)))
            .with_scratch_path(&scratch);
        let report = walker.run().unwrap();

        assert_eq!(report.packaged_count(), 1);
        assert!(!scratch.exists());
    }

    /// Observer that deletes each folder as it is announced, so listing its
    /// files fails.
    #[derive(Default)]
    struct VanishingFolders {
        base: PathBuf,
        failed_folders: Vec<PathBuf>,
        failed_files: Vec<PathBuf>,
    }

    impl BatchObserver for VanishingFolders {
        fn folder_started(&mut self, folder: &Path) {
            if folder.ends_with("gone") {
                fs::remove_dir_all(self.base.join(folder)).unwrap();
            }
        }

        fn folder_failed(&mut self, folder: &Path, _error: &ConvertError) {
            self.failed_folders.push(folder.to_path_buf());
        }

        fn file_failed(&mut self, source: &Path, _error: &ConvertError) {
            self.failed_files.push(source.to_path_buf());
        }
    }

    #[test]
    fn test_unlistable_folder_reported_as_folder_failure() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "texture_sources/gone/a.png", b"x");
        touch(temp.path(), "texture_sources/kept/b.png", b"x");

        let walker = BatchWalker::new(temp.path(), Arc::new(FixedEncoder::new(4, 4, 64)));
        let mut observer = VanishingFolders {
            base: temp.path().to_path_buf(),
            ..Default::default()
        };
        let report = walker.run_with_observer(&mut observer).unwrap();

        assert_eq!(observer.failed_folders, vec![PathBuf::from("texture_sources/gone")]);
        assert!(observer.failed_files.is_empty());
        assert_eq!(report.failure_count(), 1);
        assert!(matches!(report.failures[0].error, ConvertError::ReadFailure { .. }));
        assert_eq!(report.packaged_count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_folders_followed_without_looping() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("texture_sources");
        touch(temp.path(), "texture_sources/real/a.png", b"x");
        symlink(root.join("real"), root.join("link")).unwrap();
        symlink(root.join("real"), root.join("real/loop")).unwrap();
        symlink(root.join("missing"), root.join("real/dangling.png")).unwrap();

        let folders = discover_folders(&root).unwrap();
        let names: Vec<_> = folders
            .iter()
            .map(|f| f.strip_prefix(&root).unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["link", "real"]);

        let walker = BatchWalker::new(temp.path(), Arc::new(FixedEncoder::new(4, 4, 64)));
        let report = walker.run().unwrap();

        assert_eq!(report.packaged_count(), 2);
        assert!(report.is_clean());
        assert!(temp.path().join("texture_library/link/a.texture").exists());
        assert!(temp.path().join("texture_library/real/a.texture").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_converted() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        touch(temp.path(), "elsewhere/shared.png", b"x");
        fs::create_dir_all(temp.path().join("texture_sources/a")).unwrap();
        symlink(
            temp.path().join("elsewhere/shared.png"),
            temp.path().join("texture_sources/a/shared.png"),
        )
        .unwrap();

        let walker = BatchWalker::new(temp.path(), Arc::new(FixedEncoder::new(4, 4, 64)));
        let report = walker.run().unwrap();

        assert_eq!(report.packaged_count(), 1);
        assert!(temp.path().join("texture_library/a/shared.texture").exists());
    }

    #[test]
    fn test_process_file_rejects_path_outside_root() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "elsewhere/a.png", b"x");

        let walker = BatchWalker::new(temp.path(), Arc::new(FixedEncoder::new(4, 4, 64)));
        let err = walker
            .process_file(&temp.path().join("elsewhere/a.png"), Path::new("elsewhere/a.png"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidPath { .. }));
    }
}
