//! Per-run status tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status values recorded in a session's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateStatus {
    /// Nothing has happened yet
    Waiting,
    /// Archive download in progress
    Downloading,
    /// Archive downloaded
    DownloadCompleted,
    /// Archive download failed
    DownloadFailed,
    /// Extraction in progress
    Extracting,
    /// Archive extracted
    ExtractionCompleted,
    /// Extraction failed
    ExtractionFailed,
    /// Locating and starting the installer
    Launching,
    /// Installer started
    LaunchingCompleted,
    /// Installer not found or failed to start
    LaunchingFailed,
    /// Run finished successfully
    Completed,
    /// Run stopped on a failure
    Failed,
}

impl UpdateStatus {
    /// `true` for the `*Failed` statuses.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::DownloadFailed | Self::ExtractionFailed | Self::LaunchingFailed | Self::Failed)
    }

    /// `true` for the `*Completed` statuses.
    #[must_use]
    pub const fn is_completion(self) -> bool {
        matches!(
            self,
            Self::DownloadCompleted | Self::ExtractionCompleted | Self::LaunchingCompleted | Self::Completed
        )
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pipeline stage that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateStage {
    /// Fetching and comparing the latest release
    CheckingForUpdates,
    /// Downloading the archive
    Downloading,
    /// Expanding the archive
    Extracting,
    /// Searching the extracted tree for the installer
    LocatingInstaller,
    /// Starting the installer
    Launching,
    /// Removing the archive and extracted files
    CleaningUp,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CheckingForUpdates => "checking for updates",
            Self::Downloading => "downloading",
            Self::Extracting => "extracting",
            Self::LocatingInstaller => "locating installer",
            Self::Launching => "launching",
            Self::CleaningUp => "cleaning up",
        };
        f.write_str(name)
    }
}

/// Append-only record of the statuses one run went through.
///
/// Once a failure is recorded no completion may follow it; doing so is a bug in the
/// caller and panics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusHistory {
    entries: Vec<UpdateStatus>,
}

impl StatusHistory {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `status`.
    ///
    /// # Panics
    ///
    /// Panics when `status` is a completion and a failure was already recorded.
    pub fn push(&mut self, status: UpdateStatus) {
        assert!(
            !(status.is_completion() && self.has_failed()),
            "{status} recorded after a failure: {:?}",
            self.entries
        );
        self.entries.push(status);
    }

    /// Most recent status, or [`UpdateStatus::Waiting`] when nothing was recorded.
    #[must_use]
    pub fn current(&self) -> UpdateStatus {
        self.entries.last().copied().unwrap_or(UpdateStatus::Waiting)
    }

    /// Whether any failure was recorded.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.entries.iter().any(|s| s.is_failure())
    }

    /// Statuses in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = UpdateStatus> + '_ {
        self.entries.iter().copied()
    }

    /// Number of recorded statuses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the recorded statuses.
    #[must_use]
    pub fn as_slice(&self) -> &[UpdateStatus] {
        &self.entries
    }
}
