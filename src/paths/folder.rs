use super::{ValidatedPath, ends_with_separator, resolve};
use crate::core::UpdraftError;
use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// An absolute, normalized folder path.
///
/// Displayed with a trailing separator. A string whose last component looks like a
/// file (has an extension and no trailing separator) is treated as pointing at that
/// file, and its parent folder is used instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderPath {
    full_path: String,
}

impl FolderPath {
    /// Validate and normalize a folder path.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidPath`] or [`UpdraftError::PathTooLong`] when the
    /// string is empty, contains illegal characters, or cannot be made absolute.
    pub fn new(text: impl AsRef<str>) -> Result<Self, UpdraftError> {
        let text = text.as_ref();
        let mut path = resolve(text)?;

        if !ends_with_separator(text) && path.extension().is_some() {
            // "/tmp/x/update.zip" names a file; keep its folder
            if let Some(parent) = path.parent() {
                path = parent.to_path_buf();
            }
        }

        Ok(Self::from_normalized(path))
    }

    /// Wrap a path that is already absolute and normalized.
    pub(crate) fn from_normalized(path: PathBuf) -> Self {
        let mut full_path = path.to_string_lossy().into_owned();
        if !ends_with_separator(&full_path) {
            full_path.push(MAIN_SEPARATOR);
        }
        Self {
            full_path,
        }
    }

    /// Join a relative component onto this folder.
    #[must_use]
    pub fn join(&self, component: impl AsRef<Path>) -> PathBuf {
        self.as_path().join(component)
    }

    /// Full path string, separator-terminated.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full_path
    }
}

impl ValidatedPath for FolderPath {
    fn as_path(&self) -> &Path {
        Path::new(&self.full_path)
    }

    fn extension(&self) -> Option<&str> {
        None
    }
}

impl AsRef<Path> for FolderPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

impl std::str::FromStr for FolderPath {
    type Err = UpdraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
