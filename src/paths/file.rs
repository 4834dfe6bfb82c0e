use super::{ValidatedPath, check_length, ends_with_separator, invalid, resolve};
use crate::constants::{DEFAULT_DOWNLOAD_FILE_NAME, DEFAULT_ZIP_FILE_NAME};
use crate::core::UpdraftError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Category rule applied when building a file path.
pub(super) struct FileRule {
    /// Extension the file must end up with, `None` to keep whatever was given
    pub required_extension: Option<&'static str>,
    /// Name appended when the input names a folder
    pub default_name: &'static str,
}

/// Resolve `text` to a file path that satisfies `rule`.
///
/// - A trailing separator means a folder: `default_name` is appended.
/// - With a required extension, an input without extension is also treated as a
///   folder, and a different extension is replaced.
/// - Without one, an input without extension is rejected.
pub(super) fn resolve_file(text: &str, rule: &FileRule) -> Result<PathBuf, UpdraftError> {
    let mut path = resolve(text)?;
    let names_folder = ends_with_separator(text) || path.file_name().is_none();

    match rule.required_extension {
        None => {
            if names_folder {
                path.push(rule.default_name);
            } else if path.extension().is_none_or(|e| e.is_empty()) {
                return Err(invalid(text, "file path has no extension"));
            }
        }
        Some(required) => {
            if names_folder || path.extension().is_none() {
                path.push(rule.default_name);
            } else if !path
                .extension()
                .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(required))
            {
                path.set_extension(required);
            }
        }
    }

    check_length(&path.to_string_lossy())?;
    Ok(path)
}

/// An absolute, normalized path to a file with a non-empty extension.
///
/// Used for plain downloads where the caller picks the file type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePath {
    path: PathBuf,
}

impl FilePath {
    const RULE: FileRule = FileRule {
        required_extension: None,
        default_name: DEFAULT_DOWNLOAD_FILE_NAME,
    };

    /// Validate and normalize a file path.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidPath`] for empty or illegal strings and for file
    /// names without an extension, or [`UpdraftError::PathTooLong`].
    pub fn new(text: impl AsRef<str>) -> Result<Self, UpdraftError> {
        let path = resolve_file(text.as_ref(), &Self::RULE)?;
        Ok(Self {
            path,
        })
    }

    pub(super) fn from_resolved(path: PathBuf) -> Self {
        Self {
            path,
        }
    }
}

impl ValidatedPath for FilePath {
    fn as_path(&self) -> &Path {
        &self.path
    }
}

/// An absolute, normalized path to a `.zip` archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipPath {
    file: FilePath,
}

impl ZipPath {
    const RULE: FileRule = FileRule {
        required_extension: Some("zip"),
        default_name: DEFAULT_ZIP_FILE_NAME,
    };

    /// Validate and normalize an archive path.
    ///
    /// Folder-looking input gets `update.zip` appended; another extension is replaced
    /// with `.zip`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidPath`] or [`UpdraftError::PathTooLong`].
    pub fn new(text: impl AsRef<str>) -> Result<Self, UpdraftError> {
        let path = resolve_file(text.as_ref(), &Self::RULE)?;
        Ok(Self {
            file: FilePath::from_resolved(path),
        })
    }

    /// The archive as a generic file path.
    #[must_use]
    pub fn as_file(&self) -> &FilePath {
        &self.file
    }
}

impl ValidatedPath for ZipPath {
    fn as_path(&self) -> &Path {
        self.file.as_path()
    }
}

macro_rules! impl_path_traits {
    ($($ty:ty),+) => {
        $(
            impl AsRef<Path> for $ty {
                fn as_ref(&self) -> &Path {
                    self.as_path()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.as_path().display())
                }
            }

            impl std::str::FromStr for $ty {
                type Err = UpdraftError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::new(s)
                }
            }
        )+
    };
}

pub(super) use impl_path_traits;

impl_path_traits!(FilePath, ZipPath);
