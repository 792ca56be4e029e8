//! Source-tree to library-tree path mapping.
//!
//! A source file such as `texture_sources/foo/bar.png` maps to the package
//! file `texture_library/foo/bar.texture`, whose embedded name is
//! `texture_library/foo/bar.dds`. The mapping is a pure string transform:
//! the root segment is swapped and the three-character extension replaced.
//! Nothing on disk is touched.

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, ConvertResult};

/// Name of the directory holding source images.
pub const SOURCE_ROOT: &str = "texture_sources";

/// Name of the directory receiving packaged textures.
pub const LIBRARY_ROOT: &str = "texture_library";

/// Length of the source root prefix stripped from every source path.
pub const SOURCE_ROOT_LEN: usize = SOURCE_ROOT.len();

/// Length of the trailing `.ext` removed from every source path.
///
/// Only three-character extensions (`png`, `jpg`, `tga`, `dds`) are accepted.
pub const SOURCE_EXTENSION_LEN: usize = 4;

/// Extension of written package files.
pub const PACKAGE_EXTENSION: &str = ".texture";

/// Extension carried by the name embedded inside each package.
pub const EMBEDDED_EXTENSION: &str = ".dds";

/// Result of mapping one source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    /// Package path relative to the base directory,
    /// e.g. `texture_library/foo/bar.texture`.
    pub destination: PathBuf,

    /// Name stored inside the package, e.g. `texture_library/foo/bar.dds`.
    pub embedded_name: String,
}

/// Map a source path (relative to the base directory) to its package path
/// and embedded name.
///
/// The root segment is compared case-insensitively. Both `/` and `\` are
/// accepted as separators; the output always uses `/`.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidPath`] if the path is not valid UTF-8,
/// does not start with [`SOURCE_ROOT`], names the root itself, or does not
/// end in a three-character extension.
///
/// # Example
///
/// ```
/// use texture_converter::mapping::derive;
///
/// let mapping = derive("texture_sources/foo/bar.png").unwrap();
/// assert_eq!(mapping.destination.to_str(), Some("texture_library/foo/bar.texture"));
/// assert_eq!(mapping.embedded_name, "texture_library/foo/bar.dds");
/// ```
pub fn derive(source: impl AsRef<Path>) -> ConvertResult<PathMapping> {
    let source = source.as_ref();
    let stem = library_stem(source)?;

    Ok(PathMapping {
        destination: PathBuf::from(format!("{}{}", stem, PACKAGE_EXTENSION)),
        embedded_name: format!("{}{}", stem, EMBEDDED_EXTENSION),
    })
}

/// Library-relative path with the extension removed,
/// e.g. `texture_library/foo/bar`.
fn library_stem(source: &Path) -> ConvertResult<String> {
    let normalized = normalize(source)?;
    let rest = strip_root(source, &normalized)?;

    // rest is "/sub/dir/name.ext"; the root itself or a bare "/" is rejected
    let file_name = rest.rsplit('/').next().unwrap_or_default();
    if file_name.len() <= SOURCE_EXTENSION_LEN {
        return Err(ConvertError::invalid_path(
            source,
            "file name too short for a three-character extension",
        ));
    }
    let split = rest.len() - SOURCE_EXTENSION_LEN;
    if !rest.is_char_boundary(split) || !rest[split..].starts_with('.') {
        return Err(ConvertError::invalid_path(
            source,
            "expected a three-character extension",
        ));
    }

    Ok(format!("{}{}", LIBRARY_ROOT, &rest[..split]))
}

fn normalize(path: &Path) -> ConvertResult<String> {
    let text = path
        .to_str()
        .ok_or_else(|| ConvertError::invalid_path(path, "path is not valid UTF-8"))?;
    Ok(text.replace('\\', "/"))
}

/// Strip the source root, returning the remainder starting with `/`.
fn strip_root<'a>(original: &Path, normalized: &'a str) -> ConvertResult<&'a str> {
    let root_matches = normalized
        .get(..SOURCE_ROOT_LEN)
        .is_some_and(|root| root.eq_ignore_ascii_case(SOURCE_ROOT));
    if !root_matches {
        return Err(ConvertError::invalid_path(
            original,
            format!("not under {}", SOURCE_ROOT),
        ));
    }

    let rest = &normalized[SOURCE_ROOT_LEN..];
    if !rest.starts_with('/') || rest.len() < 2 {
        return Err(ConvertError::invalid_path(
            original,
            format!("must name an entry inside {}", SOURCE_ROOT),
        ));
    }
    Ok(rest)
}
