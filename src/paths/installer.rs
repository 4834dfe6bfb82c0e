use super::file::{FileRule, impl_path_traits, resolve_file};
use super::{FilePath, ValidatedPath, invalid};
use crate::constants::{DEFAULT_INSTALLER_FILE_NAME, DEFAULT_INSTALLER_TOKEN};
use crate::core::UpdraftError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How [`InstallerNameRule::token`] is compared with the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMatchMode {
    /// The file stem contains the token.
    #[default]
    Contains,
    /// The file stem equals the token.
    Exact,
}

/// Naming convention an installer file must follow.
///
/// The default accepts any `.exe` whose stem contains `setup`, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerNameRule {
    /// Required name fragment
    pub token: String,
    /// Compare with exact case
    #[serde(default)]
    pub case_sensitive: bool,
    /// Substring or whole-stem match
    #[serde(default)]
    pub mode: NameMatchMode,
}

impl Default for InstallerNameRule {
    fn default() -> Self {
        Self {
            token: DEFAULT_INSTALLER_TOKEN.to_string(),
            case_sensitive: false,
            mode: NameMatchMode::Contains,
        }
    }
}

impl InstallerNameRule {
    /// Rule accepting any `.exe` name.
    #[must_use]
    pub fn any() -> Self {
        Self {
            token: String::new(),
            case_sensitive: false,
            mode: NameMatchMode::Contains,
        }
    }

    /// Whether `file_stem` satisfies this rule.
    #[must_use]
    pub fn matches(&self, file_stem: &str) -> bool {
        let (stem, token) = if self.case_sensitive {
            (file_stem.to_string(), self.token.clone())
        } else {
            (file_stem.to_lowercase(), self.token.to_lowercase())
        };

        match self.mode {
            NameMatchMode::Contains => stem.contains(&token),
            NameMatchMode::Exact => stem == token,
        }
    }
}

/// An absolute, normalized path to an installer executable.
///
/// The extension is forced to `.exe` and the file name must satisfy an
/// [`InstallerNameRule`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstallerPath {
    file: FilePath,
}

impl InstallerPath {
    const RULE: FileRule = FileRule {
        required_extension: Some("exe"),
        default_name: DEFAULT_INSTALLER_FILE_NAME,
    };

    /// Validate an installer path with the default naming rule.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidPath`] when the path is invalid or the name does
    /// not contain `setup`.
    pub fn new(text: impl AsRef<str>) -> Result<Self, UpdraftError> {
        Self::with_rule(text, &InstallerNameRule::default())
    }

    /// Validate an installer path with a custom naming rule.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidPath`] when the path is invalid or the name does
    /// not satisfy `rule`.
    pub fn with_rule(text: impl AsRef<str>, rule: &InstallerNameRule) -> Result<Self, UpdraftError> {
        let text = text.as_ref();
        let path = resolve_file(text, &Self::RULE)?;

        let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
        if !rule.matches(&stem) {
            return Err(invalid(
                text,
                format!("installer name '{stem}' does not match '{}'", rule.token),
            ));
        }

        Ok(Self {
            file: FilePath::from_resolved(path),
        })
    }

    /// The installer as a generic file path.
    #[must_use]
    pub fn as_file(&self) -> &FilePath {
        &self.file
    }
}

impl ValidatedPath for InstallerPath {
    fn as_path(&self) -> &Path {
        self.file.as_path()
    }
}

impl_path_traits!(InstallerPath);
