//! Validated path value types.
//!
//! Every stage of an update works on paths that were checked once, up front: the
//! archive location, the extraction folder, the located installer. The types in this
//! module are that check. A constructed value is always absolute, lexically
//! normalized, and valid for its category:
//!
//! | Type | Category rule | Default file name |
//! |------|---------------|-------------------|
//! | [`FolderPath`] | no file component, displayed with a trailing separator | - |
//! | [`FilePath`] | must carry a non-empty extension | `download.bin` |
//! | [`ZipPath`] | extension forced to `.zip` | `update.zip` |
//! | [`InstallerPath`] | extension forced to `.exe`, name checked by an [`InstallerNameRule`] | `setup.exe` |
//!
//! Construction never touches the file system. Whether the path exists is a separate
//! query, [`ValidatedPath::path_exists`].
//!
//! Equality and hashing use the normalized path string.
//!
//! # Examples
//!
//! ```rust,no_run
//! use updraft::paths::{FolderPath, ValidatedPath, ZipPath};
//!
//! # fn example() -> Result<(), updraft::core::UpdraftError> {
//! let folder = FolderPath::new("/tmp/updates/./app/")?;
//! assert_eq!(folder.to_string(), "/tmp/updates/app/");
//!
//! // A folder-looking zip path gets the default archive name
//! let zip = ZipPath::new("/tmp/updates/")?;
//! assert_eq!(zip.file_name(), Some("update.zip"));
//!
//! // A wrong extension is replaced
//! let zip = ZipPath::new("/tmp/updates/release.tar")?;
//! assert_eq!(zip.extension(), Some("zip"));
//! # Ok(())
//! # }
//! ```

mod file;
mod folder;
mod installer;

pub use file::{FilePath, ZipPath};
pub use folder::FolderPath;
pub use installer::{InstallerNameRule, InstallerPath, NameMatchMode};

use crate::constants::MAX_PATH_LEN;
use crate::core::UpdraftError;
use std::path::{Component, Path, PathBuf};

/// Shared read-only queries over the validated path types.
pub trait ValidatedPath {
    /// The normalized absolute path.
    fn as_path(&self) -> &Path;

    /// Whether something exists at this path right now.
    fn path_exists(&self) -> bool {
        self.as_path().exists()
    }

    /// Final path component, if it is valid UTF-8.
    fn file_name(&self) -> Option<&str> {
        self.as_path().file_name().and_then(|n| n.to_str())
    }

    /// Extension of the final component without the dot.
    fn extension(&self) -> Option<&str> {
        self.as_path().extension().and_then(|e| e.to_str())
    }

    /// The folder containing this path. `None` for a file system root.
    fn parent_folder(&self) -> Option<FolderPath> {
        self.as_path().parent().map(|p| FolderPath::from_normalized(p.to_path_buf()))
    }
}

/// Characters rejected in any path string, on every platform.
///
/// Installers are Windows executables, so the Windows set applies everywhere.
const ILLEGAL_CHARS: [char; 6] = ['<', '>', '"', '|', '?', '*'];

fn invalid(text: &str, reason: impl Into<String>) -> UpdraftError {
    UpdraftError::InvalidPath {
        path: text.to_string(),
        reason: reason.into(),
    }
}

/// Whether the raw string ends in a separator, i.e. names a folder explicitly.
fn ends_with_separator(text: &str) -> bool {
    text.ends_with(|c: char| c == '/' || std::path::is_separator(c))
}

/// Check a raw path string and turn it into a normalized absolute path.
///
/// Rejects empty or whitespace-only strings, control characters, characters illegal
/// on Windows, and strings longer than the platform limit. Relative paths are
/// resolved against the current directory; `.` and `..` are resolved lexically.
fn resolve(text: &str) -> Result<PathBuf, UpdraftError> {
    if text.trim().is_empty() {
        return Err(invalid(text, "path is empty"));
    }

    if let Some(c) = text.chars().find(|c| c.is_control() || ILLEGAL_CHARS.contains(c)) {
        return Err(invalid(text, format!("path contains illegal character {c:?}")));
    }

    check_length(text)?;

    let raw = Path::new(text);
    let absolute = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| invalid(text, format!("cannot resolve relative path: {e}")))?;
        cwd.join(raw)
    };

    let normalized = normalize(&absolute);
    check_length(&normalized.to_string_lossy())?;
    Ok(normalized)
}

fn check_length(text: &str) -> Result<(), UpdraftError> {
    if text.len() > MAX_PATH_LEN {
        return Err(UpdraftError::PathTooLong {
            path: text.to_string(),
        });
    }
    Ok(())
}

/// Resolve `.` and `..` without touching the file system.
///
/// `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}
