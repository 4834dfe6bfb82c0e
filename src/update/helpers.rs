//! One-shot entry points usable without building a pipeline.
//!
//! Each helper runs a single stage and converts its outcome into an
//! [`UpdateResult`]. They never return `Err`: failures carry their [`ResultKind`].

use super::result::UpdateResult;
use crate::archive::{ArchiveExtractor, ExtractionReport, ZipExtractor};
use crate::config::UpdateSettings;
use crate::core::{ResultKind, UpdraftError};
use crate::download::{ArchiveDownloader, HttpDownloader};
use crate::github::{GithubClient, ReleaseInfo, ReleaseSource, Repository};
use crate::installer::{InstallerLauncher, InstallerLocator, ProcessLauncher};
use crate::paths::{FolderPath, InstallerPath, ZipPath};
use crate::version::{VersionComparator, VersionTag};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What a version check found.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Version of the newest release considered
    pub latest: VersionTag,
    /// The release itself
    pub release: ReleaseInfo,
    /// Whether `latest` is newer than the installed version
    pub update_available: bool,
}

/// Check `owner/repo` for a release newer than `current`.
///
/// With `current == None` any release counts as an update. Pre-releases are only
/// considered when `allow_prerelease` is set.
pub async fn check_for_updates(
    owner: &str,
    repo: &str,
    current: Option<VersionTag>,
    allow_prerelease: bool,
    settings: &UpdateSettings,
    cancel: &CancellationToken,
) -> UpdateResult<VersionInfo> {
    let setup = Repository::new(owner, repo)
        .and_then(|repository| Ok((repository, GithubClient::from_settings(settings)?)));
    let (repository, client) = match setup {
        Ok(pair) => pair,
        Err(e) => return e.into(),
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => UpdateResult::from(UpdraftError::Cancelled { stage: "checking for updates".to_string() }),
        result = check_with_source(&client, &repository, current, allow_prerelease) => result,
    }
}

/// Same as [`check_for_updates`] against any [`ReleaseSource`].
pub async fn check_with_source(
    source: &dyn ReleaseSource,
    repository: &Repository,
    current: Option<VersionTag>,
    allow_prerelease: bool,
) -> UpdateResult<VersionInfo> {
    let fetched = if allow_prerelease {
        source.latest_release_including_prereleases(repository).await
    } else {
        source.latest_release(repository).await
    };

    let info = fetched.and_then(|release| {
        let latest = release.version_tag()?;
        Ok(VersionInfo {
            latest,
            update_available: VersionComparator::is_update(current.as_ref(), &latest),
            release,
        })
    });

    match info {
        Ok(info) if info.update_available => {
            let message = format!("{} {} is available", repository, info.latest);
            UpdateResult::success(ResultKind::UpdateAvailable, message, Some(info))
        }
        Ok(info) => {
            let message = format!("{} {} is already installed", repository, info.latest);
            UpdateResult::success(ResultKind::UpdateAlreadyInstalled, message, Some(info))
        }
        Err(e) => UpdateResult::failure(&e, None),
    }
}

/// Download `url` into `destination`. The value is the number of bytes written.
pub async fn download_zip(
    url: &str,
    destination: &ZipPath,
    settings: &UpdateSettings,
    cancel: &CancellationToken,
) -> UpdateResult<u64> {
    let downloader = match HttpDownloader::from_settings(settings) {
        Ok(downloader) => downloader,
        Err(e) => return e.into(),
    };
    let result = downloader.download(url, destination.as_file(), cancel).await;
    UpdateResult::from_result(result, ResultKind::Completed, |bytes| {
        format!("Downloaded {bytes} bytes to {destination}")
    })
}

/// Expand `archive` into `destination`.
pub async fn extract_zip_file(
    archive: &ZipPath,
    destination: &FolderPath,
    overwrite: bool,
    cancel: &CancellationToken,
) -> UpdateResult<ExtractionReport> {
    let result = ZipExtractor.extract(archive, destination, overwrite, cancel).await;
    UpdateResult::from_result(result, ResultKind::Completed, |report| {
        format!("Extracted {} file(s) into {}", report.files_written, report.destination)
    })
}

/// Search `folder` for an installer whose name contains every token.
///
/// Empty `tokens` falls back to the default `setup` + `exe`.
pub fn locate_setup<S: AsRef<str>>(folder: &FolderPath, tokens: &[S]) -> UpdateResult<InstallerPath> {
    let locator = if tokens.is_empty() {
        InstallerLocator::default()
    } else {
        InstallerLocator::new(tokens)
    };
    debug!("Locating installer under {folder}");
    UpdateResult::from_result(locator.locate(folder), ResultKind::Completed, |exe| {
        format!("Found installer {exe}")
    })
}

/// Start `exe` detached, optionally elevated.
pub async fn launch_setup(exe: &InstallerPath, require_elevation: bool) -> UpdateResult<()> {
    let result = ProcessLauncher.launch(exe, require_elevation).await;
    UpdateResult::from_result(result, ResultKind::Completed, |()| format!("Started {exe}"))
}
