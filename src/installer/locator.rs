//! Installer discovery inside an extracted release.
//!
//! # Search Order
//!
//! The search is a depth-first walk with a fixed order, so the same tree always
//! yields the same installer:
//!
//! 1. List the current folder, sorted by file name
//! 2. Check every file at this level; the first match wins
//! 3. Only if none matched, descend into each subfolder in sorted order
//!
//! A folder that cannot be listed counts as "no match here" and the search moves on
//! to its siblings. Symbolic links are not followed.
//!
//! A file matches when its lowercased name contains every match token and ends in
//! `.exe`. A locator built [`with_rule`](InstallerLocator::with_rule) also requires
//! the name to satisfy that [`InstallerNameRule`].

use crate::constants::DEFAULT_MATCH_TOKENS;
use crate::core::UpdraftError;
use crate::paths::{FolderPath, InstallerNameRule, InstallerPath, ValidatedPath};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Finds the installer executable in an extracted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerLocator {
    tokens: Vec<String>,
    rule: Option<InstallerNameRule>,
}

impl Default for InstallerLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_TOKENS)
    }
}

impl InstallerLocator {
    /// Locator requiring every token in `tokens` (case-insensitive).
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
            rule: None,
        }
    }

    /// Additionally require matches to satisfy `rule`.
    #[must_use]
    pub fn with_rule(mut self, rule: InstallerNameRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Search `root` for an installer.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::SetupNotFound`] naming `root` when no file in the whole
    /// tree matches.
    pub fn locate(&self, root: &FolderPath) -> Result<InstallerPath, UpdraftError> {
        debug!("Searching {root} for an installer matching {:?}", self.tokens);
        let rule = self.rule.clone().unwrap_or_else(InstallerNameRule::any);
        self.search(root.as_path(), &rule).ok_or_else(|| UpdraftError::SetupNotFound {
            folder: root.to_string(),
        })
    }

    fn matches(&self, file_name: &str) -> bool {
        let lowered = file_name.to_lowercase();
        self.tokens.iter().all(|t| lowered.contains(t.as_str()))
    }

    fn search(&self, dir: &Path, rule: &InstallerNameRule) -> Option<InstallerPath> {
        let mut files: Vec<PathBuf> = Vec::new();
        let mut folders: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry under {}: {e}", dir.display());
                    continue;
                }
            };
            let file_type = entry.file_type();
            if file_type.is_file() {
                files.push(entry.into_path());
            } else if file_type.is_dir() {
                folders.push(entry.into_path());
            }
        }

        for file in &files {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !self.matches(name) {
                continue;
            }
            match InstallerPath::with_rule(file.to_string_lossy(), rule) {
                Ok(installer) if installer.as_path() == file.as_path() => return Some(installer),
                Ok(_) => debug!("Skipping {}: extension is not .exe", file.display()),
                Err(e) => warn!("Skipping candidate installer {}: {e}", file.display()),
            }
        }

        folders.iter().find_map(|folder| self.search(folder, rule))
    }
}

/// Search `root` for an installer whose name contains every token in `tokens`.
///
/// Shorthand for [`InstallerLocator::new`] followed by [`InstallerLocator::locate`].
///
/// # Errors
///
/// Returns [`UpdraftError::SetupNotFound`] when nothing matches.
pub fn find_installer<S: AsRef<str>>(root: &FolderPath, tokens: &[S]) -> Result<InstallerPath, UpdraftError> {
    InstallerLocator::new(tokens).locate(root)
}
