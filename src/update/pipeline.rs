//! The update state machine.
//!
//! ```text
//! Created ─▶ CheckingForUpdates ─┬─▶ UpdateAlreadyCurrent
//!                                ├─▶ PreviewRejected
//!                                └─▶ Downloading ─▶ Extracting ─┬─▶ SetupSkippedByConfig
//!                                                               └─▶ LocatingInstaller ─▶ Launching ─┬─▶ CleaningUp ─▶ Completed
//!                                                                                                   └─▶ Completed
//! any stage ─▶ Failed
//! ```
//!
//! Stages run one after another. The first failure stops the run and its kind and
//! message become the run's result. Nothing is retried. The cancellation token is
//! checked before every stage and while waiting on network I/O.

use super::result::UpdateResult;
use super::session::UpdateSession;
use super::status::{UpdateStage, UpdateStatus};
use crate::archive::ArchiveExtractor;
use crate::config::UpdateSettings;
use crate::core::{ResultKind, UpdraftError};
use crate::download::ArchiveDownloader;
use crate::github::{ReleaseInfo, ReleaseSource};
use crate::installer::{InstallerLauncher, InstallerLocator};
use crate::paths::{InstallerPath, ValidatedPath};
use crate::version::VersionComparator;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// States of the update state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Built, not yet run
    Created,
    /// Fetching and comparing the latest release
    CheckingForUpdates,
    /// Installed version is current (terminal, success)
    UpdateAlreadyCurrent,
    /// Latest release is a pre-release and those are rejected (terminal, success)
    PreviewRejected,
    /// Downloading the archive
    Downloading,
    /// Expanding the archive
    Extracting,
    /// Setup launch disabled by configuration (terminal, success)
    SetupSkippedByConfig,
    /// Searching for the installer
    LocatingInstaller,
    /// Starting the installer
    Launching,
    /// Removing downloaded and extracted files
    CleaningUp,
    /// Finished (terminal, success)
    Completed,
    /// Stopped on a failure (terminal)
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Behavior switches of a run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Stop successfully on a pre-release
    pub reject_previews: bool,
    /// Locate and launch the installer after extraction
    pub starts_setup: bool,
    /// Remove the archive and extracted entries after launching
    pub tidies_up: bool,
    /// Runtime settings
    pub settings: UpdateSettings,
}

/// A configured update run. Created by [`UpdateBuilder::build`](super::UpdateBuilder::build).
pub struct UpdatePipeline {
    session: UpdateSession,
    options: PipelineOptions,
    source: Arc<dyn ReleaseSource>,
    downloader: Arc<dyn ArchiveDownloader>,
    extractor: Arc<dyn ArchiveExtractor>,
    launcher: Arc<dyn InstallerLauncher>,
}

/// Early exit of a stage: a success kind that ends the run, or a failure.
enum Stop {
    Done(ResultKind, String),
    Failed(UpdateStage, UpdraftError),
}

type StageResult<T> = Result<T, Stop>;

impl UpdatePipeline {
    pub(crate) fn new(
        session: UpdateSession,
        options: PipelineOptions,
        source: Arc<dyn ReleaseSource>,
        downloader: Arc<dyn ArchiveDownloader>,
        extractor: Arc<dyn ArchiveExtractor>,
        launcher: Arc<dyn InstallerLauncher>,
    ) -> Self {
        Self {
            session,
            options,
            source,
            downloader,
            extractor,
            launcher,
        }
    }

    /// The session record as configured
    #[must_use]
    pub fn session(&self) -> &UpdateSession {
        &self.session
    }

    /// The run's switches
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run the pipeline to a terminal state.
    ///
    /// Never returns an error directly: failures are reported through the result's
    /// `success` flag and `kind`. The session is always returned as the value so the
    /// caller can inspect the status history.
    pub async fn run(mut self, cancel: &CancellationToken) -> UpdateResult<UpdateSession> {
        info!("Starting update of {}", self.session.repository());
        self.session.set_updating(true);

        let outcome = self.run_stages(cancel).await;
        self.session.set_updating(false);

        match outcome {
            Ok((kind, message)) | Err(Stop::Done(kind, message)) => {
                self.session.record(UpdateStatus::Completed);
                info!("Update of {} finished: {message}", self.session.repository());
                UpdateResult::success(kind, message, Some(self.session))
            }
            Err(Stop::Failed(stage, error)) => {
                self.transition(PipelineState::Failed);
                warn!("Update of {} failed while {stage}: {error}", self.session.repository());
                self.session.record_failure(stage, error.kind());
                self.session.record(UpdateStatus::Failed);
                UpdateResult::failure(&error, Some(self.session))
            }
        }
    }

    async fn run_stages(&mut self, cancel: &CancellationToken) -> StageResult<(ResultKind, String)> {
        let release = self.check_for_updates(cancel).await?;
        let url = self.select_archive(&release)?;

        self.download(&url, cancel).await?;
        self.extract(cancel).await?;

        if !self.options.starts_setup {
            self.transition(PipelineState::SetupSkippedByConfig);
            return Err(Stop::Done(
                ResultKind::SetupSkipped,
                format!("Downloaded and extracted to {}; setup not started", self.session.extraction_folder()),
            ));
        }

        let installer = self.locate_installer(cancel).await?;
        self.launch(&installer, cancel).await?;

        let mut message = format!("Started installer {installer}");
        if self.options.tidies_up {
            self.transition(PipelineState::CleaningUp);
            let leftovers = self.clean_up().await;
            if !leftovers.is_empty() {
                message.push_str(&format!("; cleanup left {} item(s) behind", leftovers.len()));
            }
        }

        self.transition(PipelineState::Completed);
        Ok((ResultKind::Completed, message))
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("{}: {} -> {}", self.session.repository(), self.session.state(), next);
        self.session.set_state(next);
    }

    fn ensure_not_cancelled(cancel: &CancellationToken, stage: UpdateStage) -> StageResult<()> {
        if cancel.is_cancelled() {
            return Err(Stop::Failed(
                stage,
                UpdraftError::Cancelled {
                    stage: stage.to_string(),
                },
            ));
        }
        Ok(())
    }

    /// Await `future` unless the token fires first.
    async fn cancellable<T>(
        cancel: &CancellationToken,
        stage: UpdateStage,
        future: impl Future<Output = Result<T, UpdraftError>>,
    ) -> StageResult<T> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Stop::Failed(stage, UpdraftError::Cancelled { stage: stage.to_string() })),
            result = future => result.map_err(|e| Stop::Failed(stage, e)),
        }
    }

    async fn check_for_updates(&mut self, cancel: &CancellationToken) -> StageResult<ReleaseInfo> {
        const STAGE: UpdateStage = UpdateStage::CheckingForUpdates;
        Self::ensure_not_cancelled(cancel, STAGE)?;
        self.transition(PipelineState::CheckingForUpdates);

        let source = Arc::clone(&self.source);
        let repository = self.session.repository().clone();
        let release = Self::cancellable(cancel, STAGE, source.latest_release(&repository)).await?;
        let latest = release.version_tag().map_err(|e| Stop::Failed(STAGE, e))?;
        info!("Latest release of {repository} is {latest}");

        let url = release.archive_url(self.options.settings.preferred_asset.as_deref()).map(str::to_string);
        self.session.set_latest(latest, url);

        if let Some(current) = self.session.current_version().copied()
            && !VersionComparator::is_update(Some(&current), &latest)
        {
            self.transition(PipelineState::UpdateAlreadyCurrent);
            return Err(Stop::Done(
                ResultKind::UpdateAlreadyInstalled,
                format!("{current} is already installed (latest release is {latest})"),
            ));
        }

        if self.options.reject_previews && latest.qualifier.is_prerelease() {
            self.transition(PipelineState::PreviewRejected);
            return Err(Stop::Done(
                ResultKind::PreviewRejected,
                format!("Latest release {latest} is a pre-release; skipped"),
            ));
        }

        Ok(release)
    }

    fn select_archive(&self, release: &ReleaseInfo) -> StageResult<String> {
        self.session.download_url().map(str::to_string).ok_or_else(|| {
            Stop::Failed(
                UpdateStage::CheckingForUpdates,
                UpdraftError::MalformedResponse {
                    url: release.html_url.clone().unwrap_or_else(|| release.tag_name.clone()),
                    reason: "release has no zip archive".to_string(),
                },
            )
        })
    }

    async fn download(&mut self, url: &str, cancel: &CancellationToken) -> StageResult<()> {
        const STAGE: UpdateStage = UpdateStage::Downloading;
        Self::ensure_not_cancelled(cancel, STAGE)?;
        self.transition(PipelineState::Downloading);
        self.session.record(UpdateStatus::Downloading);

        let downloader = Arc::clone(&self.downloader);
        let zip_path = self.session.zip_path().clone();
        match downloader.download(url, zip_path.as_file(), cancel).await {
            Ok(bytes) => {
                debug!("Downloaded {bytes} bytes to {zip_path}");
                self.session.record(UpdateStatus::DownloadCompleted);
                Ok(())
            }
            Err(e) => {
                self.session.record(UpdateStatus::DownloadFailed);
                Err(Stop::Failed(STAGE, e))
            }
        }
    }

    async fn extract(&mut self, cancel: &CancellationToken) -> StageResult<()> {
        const STAGE: UpdateStage = UpdateStage::Extracting;
        Self::ensure_not_cancelled(cancel, STAGE)?;
        self.transition(PipelineState::Extracting);
        self.session.record(UpdateStatus::Extracting);

        let extractor = Arc::clone(&self.extractor);
        let zip_path = self.session.zip_path().clone();
        let folder = self.session.extraction_folder().clone();
        match extractor.extract(&zip_path, &folder, self.options.settings.overwrite, cancel).await {
            Ok(report) => {
                self.session.set_extracted_entries(report.root_entries);
                self.session.record(UpdateStatus::ExtractionCompleted);
                Ok(())
            }
            Err(e) => {
                self.session.record(UpdateStatus::ExtractionFailed);
                Err(Stop::Failed(STAGE, e))
            }
        }
    }

    async fn locate_installer(&mut self, cancel: &CancellationToken) -> StageResult<InstallerPath> {
        const STAGE: UpdateStage = UpdateStage::LocatingInstaller;
        Self::ensure_not_cancelled(cancel, STAGE)?;
        self.transition(PipelineState::LocatingInstaller);
        self.session.record(UpdateStatus::Launching);

        let settings = &self.options.settings;
        let mut locator = InstallerLocator::new(&settings.installer_tokens);
        if let Some(rule) = &settings.installer_rule {
            locator = locator.with_rule(rule.clone());
        }
        let folder = self.session.extraction_folder().clone();

        let located = tokio::task::spawn_blocking(move || locator.locate(&folder)).await;
        let located = match located {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => Err(UpdraftError::Cancelled {
                stage: STAGE.to_string(),
            }),
        };

        match located {
            Ok(installer) => {
                info!("Found installer {installer}");
                self.session.set_installer(installer.clone());
                Ok(installer)
            }
            Err(e) => {
                self.session.record(UpdateStatus::LaunchingFailed);
                Err(Stop::Failed(STAGE, e))
            }
        }
    }

    async fn launch(&mut self, installer: &InstallerPath, cancel: &CancellationToken) -> StageResult<()> {
        const STAGE: UpdateStage = UpdateStage::Launching;
        if let Err(stop) = Self::ensure_not_cancelled(cancel, STAGE) {
            self.session.record(UpdateStatus::LaunchingFailed);
            return Err(stop);
        }
        self.transition(PipelineState::Launching);

        let launcher = Arc::clone(&self.launcher);
        match launcher.launch(installer, self.options.settings.require_elevation).await {
            Ok(()) => {
                self.session.record(UpdateStatus::LaunchingCompleted);
                Ok(())
            }
            Err(e) => {
                self.session.record(UpdateStatus::LaunchingFailed);
                Err(Stop::Failed(STAGE, e))
            }
        }
    }

    /// Remove the archive and the entries extraction created.
    ///
    /// Best-effort: failures are logged and returned, never propagated.
    async fn clean_up(&mut self) -> Vec<PathBuf> {
        let mut targets: Vec<PathBuf> = vec![self.session.zip_path().as_path().to_path_buf()];
        targets.extend(self.session.extracted_entries().iter().cloned());

        let mut leftovers = Vec::new();
        for target in targets {
            let removal = match tokio::fs::symlink_metadata(&target).await {
                Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(&target).await,
                Ok(_) => tokio::fs::remove_file(&target).await,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e),
            };
            match removal {
                Ok(()) => debug!("Removed {}", target.display()),
                Err(e) => {
                    warn!("Cleanup could not remove {}: {e}", target.display());
                    leftovers.push(target);
                }
            }
        }

        // Drop the extraction folder too when nothing else lives there
        let folder = self.session.extraction_folder().as_path().to_path_buf();
        if tokio::fs::remove_dir(&folder).await.is_ok() {
            debug!("Removed empty extraction folder {}", folder.display());
        }

        leftovers
    }
}
