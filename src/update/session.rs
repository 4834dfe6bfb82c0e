//! The record of one update run.

use super::pipeline::PipelineState;
use super::status::{StatusHistory, UpdateStage, UpdateStatus};
use crate::core::ResultKind;
use crate::github::Repository;
use crate::paths::{FolderPath, InstallerPath, ZipPath};
use crate::version::VersionTag;
use std::path::PathBuf;

/// Everything known about one run of the pipeline.
///
/// The pipeline is the only writer; callers get a read-only view through the
/// accessors, usually after the run has finished.
#[derive(Debug, Clone)]
pub struct UpdateSession {
    repository: Repository,
    zip_path: ZipPath,
    extraction_folder: FolderPath,
    download_url: Option<String>,
    current_version: Option<VersionTag>,
    latest_version: Option<VersionTag>,
    installer_path: Option<InstallerPath>,
    extracted_entries: Vec<PathBuf>,
    is_updating: bool,
    history: StatusHistory,
    failure: Option<(UpdateStage, ResultKind)>,
    state: PipelineState,
}

impl UpdateSession {
    pub(crate) fn new(
        repository: Repository,
        zip_path: ZipPath,
        extraction_folder: FolderPath,
        current_version: Option<VersionTag>,
    ) -> Self {
        Self {
            repository,
            zip_path,
            extraction_folder,
            download_url: None,
            current_version,
            latest_version: None,
            installer_path: None,
            extracted_entries: Vec::new(),
            is_updating: false,
            history: StatusHistory::new(),
            failure: None,
            state: PipelineState::Created,
        }
    }

    /// Repository being updated from
    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Where the archive is downloaded
    #[must_use]
    pub fn zip_path(&self) -> &ZipPath {
        &self.zip_path
    }

    /// Where the archive is extracted
    #[must_use]
    pub fn extraction_folder(&self) -> &FolderPath {
        &self.extraction_folder
    }

    /// Archive URL chosen from the release
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    /// Installed version the caller reported
    #[must_use]
    pub fn current_version(&self) -> Option<&VersionTag> {
        self.current_version.as_ref()
    }

    /// Version of the latest release, once fetched
    #[must_use]
    pub fn latest_version(&self) -> Option<&VersionTag> {
        self.latest_version.as_ref()
    }

    /// Installer that was located, if the run got that far
    #[must_use]
    pub fn installer_path(&self) -> Option<&InstallerPath> {
        self.installer_path.as_ref()
    }

    /// Top-level entries created by extraction
    #[must_use]
    pub fn extracted_entries(&self) -> &[PathBuf] {
        &self.extracted_entries
    }

    /// Whether the pipeline is currently running
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.is_updating
    }

    /// Status history of the run
    #[must_use]
    pub fn history(&self) -> &StatusHistory {
        &self.history
    }

    /// Most recent status, `Waiting` before anything happened
    #[must_use]
    pub fn current_status(&self) -> UpdateStatus {
        self.history.current()
    }

    /// Stage and kind of the failure that stopped the run
    #[must_use]
    pub fn failure(&self) -> Option<(UpdateStage, ResultKind)> {
        self.failure
    }

    /// State machine state; terminal once the run has returned
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: PipelineState) {
        self.state = state;
    }

    pub(crate) fn set_updating(&mut self, updating: bool) {
        self.is_updating = updating;
    }

    pub(crate) fn set_latest(&mut self, version: VersionTag, download_url: Option<String>) {
        self.latest_version = Some(version);
        self.download_url = download_url;
    }

    pub(crate) fn set_installer(&mut self, installer: InstallerPath) {
        self.installer_path = Some(installer);
    }

    pub(crate) fn set_extracted_entries(&mut self, entries: Vec<PathBuf>) {
        self.extracted_entries = entries;
    }

    pub(crate) fn record(&mut self, status: UpdateStatus) {
        self.history.push(status);
    }

    pub(crate) fn record_failure(&mut self, stage: UpdateStage, kind: ResultKind) {
        self.failure = Some((stage, kind));
    }
}
