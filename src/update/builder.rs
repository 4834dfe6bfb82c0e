//! Staged configuration of an update run.
//!
//! The builder moves through three states and each state only offers the calls that
//! make sense next, so an incomplete configuration does not compile:
//!
//! ```text
//! Updater::create ──▶ UpdateBuilder<NeedsPaths>
//!     where_paths ──▶ UpdateBuilder<NeedsAction>
//!      run_update ──▶ UpdateBuilder<Configuring> ──build──▶ UpdatePipeline
//! ```
//!
//! Inputs are validated as soon as they are given: an empty owner fails in
//! [`Updater::create`], a bad archive path in [`UpdateBuilder::where_paths`].

use super::pipeline::{PipelineOptions, UpdatePipeline};
use super::session::UpdateSession;
use crate::archive::{ArchiveExtractor, ZipExtractor};
use crate::config::UpdateSettings;
use crate::core::UpdraftError;
use crate::download::{ArchiveDownloader, HttpDownloader};
use crate::github::{GithubClient, ReleaseSource, Repository};
use crate::installer::{InstallerLauncher, ProcessLauncher};
use crate::paths::{FolderPath, ZipPath};
use crate::version::VersionTag;
use std::sync::Arc;

/// Entry point of the fluent API.
pub struct Updater;

impl Updater {
    /// Start configuring an update from `owner/repo`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidRepository`] when either name is empty or invalid.
    pub fn create(owner: &str, repo: &str) -> Result<UpdateBuilder<NeedsPaths>, UpdraftError> {
        Ok(UpdateBuilder {
            repository: Repository::new(owner, repo)?,
            state: NeedsPaths,
        })
    }
}

/// Waiting for the archive and extraction paths.
#[derive(Debug)]
pub struct NeedsPaths;

/// Paths are set; waiting for the action to perform.
#[derive(Debug)]
pub struct NeedsAction {
    zip_path: ZipPath,
    extraction_folder: FolderPath,
}

/// Configuring preconditions and collaborators of an update run.
pub struct Configuring {
    zip_path: ZipPath,
    extraction_folder: FolderPath,
    current_version: Option<VersionTag>,
    reject_previews: bool,
    starts_setup: bool,
    tidies_up: bool,
    settings: UpdateSettings,
    source: Option<Arc<dyn ReleaseSource>>,
    downloader: Option<Arc<dyn ArchiveDownloader>>,
    extractor: Option<Arc<dyn ArchiveExtractor>>,
    launcher: Option<Arc<dyn InstallerLauncher>>,
}

/// Typestate builder for [`UpdatePipeline`]; see the module docs.
pub struct UpdateBuilder<S> {
    repository: Repository,
    state: S,
}

impl<S> UpdateBuilder<S> {
    /// Repository being configured
    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}

impl UpdateBuilder<NeedsPaths> {
    /// Set where to download the archive and where to extract it.
    ///
    /// A folder given as `zip_path` gets `update.zip` appended.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidPath`] or [`UpdraftError::PathTooLong`] for
    /// either path.
    pub fn where_paths(
        self,
        zip_path: impl AsRef<str>,
        extraction_folder: impl AsRef<str>,
    ) -> Result<UpdateBuilder<NeedsAction>, UpdraftError> {
        let zip_path = ZipPath::new(zip_path)?;
        let extraction_folder = FolderPath::new(extraction_folder)?;
        Ok(self.where_typed(zip_path, extraction_folder))
    }

    /// Same as [`where_paths`](Self::where_paths) with already validated paths.
    #[must_use]
    pub fn where_typed(self, zip_path: ZipPath, extraction_folder: FolderPath) -> UpdateBuilder<NeedsAction> {
        UpdateBuilder {
            repository: self.repository,
            state: NeedsAction {
                zip_path,
                extraction_folder,
            },
        }
    }
}

impl UpdateBuilder<NeedsAction> {
    /// Run the full update: check, download, extract, and by default launch setup.
    #[must_use]
    pub fn run_update(self) -> UpdateBuilder<Configuring> {
        UpdateBuilder {
            repository: self.repository,
            state: Configuring {
                zip_path: self.state.zip_path,
                extraction_folder: self.state.extraction_folder,
                current_version: None,
                reject_previews: false,
                starts_setup: true,
                tidies_up: false,
                settings: UpdateSettings::default(),
                source: None,
                downloader: None,
                extractor: None,
                launcher: None,
            },
        }
    }
}

impl UpdateBuilder<Configuring> {
    /// Only update when the latest release is newer than `installed`.
    ///
    /// Without this call the version comparison is skipped.
    #[must_use]
    pub fn if_version_bigger_than(mut self, installed: VersionTag) -> Self {
        self.state.current_version = Some(installed);
        self
    }

    /// Parse `installed` and call [`if_version_bigger_than`](Self::if_version_bigger_than).
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidVersion`] when `installed` does not parse.
    pub fn if_version_bigger_than_str(self, installed: &str) -> Result<Self, UpdraftError> {
        Ok(self.if_version_bigger_than(VersionTag::parse(installed)?))
    }

    /// Stop successfully when the latest release is a pre-release.
    #[must_use]
    pub fn if_not_preview(mut self) -> Self {
        self.state.reject_previews = true;
        self
    }

    /// Launch the installer after extraction (default `true`).
    #[must_use]
    pub fn starts_setup(mut self, starts: bool) -> Self {
        self.state.starts_setup = starts;
        self
    }

    /// Remove the archive and extracted files after launching (default `false`).
    #[must_use]
    pub fn tidies_up(mut self, tidy: bool) -> Self {
        self.state.tidies_up = tidy;
        self
    }

    /// Runtime settings: timeouts, token, installer tokens, elevation, overwrite.
    #[must_use]
    pub fn with_settings(mut self, settings: UpdateSettings) -> Self {
        self.state.settings = settings;
        self
    }

    /// Use `source` instead of the GitHub REST client.
    #[must_use]
    pub fn with_release_source(mut self, source: Arc<dyn ReleaseSource>) -> Self {
        self.state.source = Some(source);
        self
    }

    /// Use `downloader` instead of the HTTP downloader.
    #[must_use]
    pub fn with_downloader(mut self, downloader: Arc<dyn ArchiveDownloader>) -> Self {
        self.state.downloader = Some(downloader);
        self
    }

    /// Use `extractor` instead of the zip extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtractor>) -> Self {
        self.state.extractor = Some(extractor);
        self
    }

    /// Use `launcher` instead of starting a real process.
    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn InstallerLauncher>) -> Self {
        self.state.launcher = Some(launcher);
        self
    }

    /// Finish configuration.
    ///
    /// Collaborators that were not supplied are created from the settings.
    ///
    /// # Errors
    ///
    /// Returns an error when a default HTTP client cannot be created, e.g. because
    /// the configured API base URL is invalid.
    pub fn build(self) -> Result<UpdatePipeline, UpdraftError> {
        let Configuring {
            zip_path,
            extraction_folder,
            current_version,
            reject_previews,
            starts_setup,
            tidies_up,
            settings,
            source,
            downloader,
            extractor,
            launcher,
        } = self.state;

        let source: Arc<dyn ReleaseSource> = match source {
            Some(source) => source,
            None => Arc::new(GithubClient::from_settings(&settings)?),
        };
        let downloader: Arc<dyn ArchiveDownloader> = match downloader {
            Some(downloader) => downloader,
            None => Arc::new(HttpDownloader::from_settings(&settings)?),
        };
        let extractor = extractor.unwrap_or_else(|| Arc::new(ZipExtractor));
        let launcher = launcher.unwrap_or_else(|| Arc::new(ProcessLauncher));

        let session = UpdateSession::new(self.repository, zip_path, extraction_folder, current_version);
        let options = PipelineOptions {
            reject_previews,
            starts_setup,
            tidies_up,
            settings,
        };

        Ok(UpdatePipeline::new(session, options, source, downloader, extractor, launcher))
    }
}
