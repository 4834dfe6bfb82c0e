//! Recording stand-ins for the pipeline collaborators.
//!
//! Each fake counts its calls so tests can assert which stages ran. Failures are
//! produced by a closure because [`UpdraftError`] is not `Clone`.

use crate::archive::{ArchiveExtractor, ExtractionReport, ZipExtractor};
use crate::core::UpdraftError;
use crate::download::ArchiveDownloader;
use crate::github::{ReleaseInfo, ReleaseSource, Repository};
use crate::installer::InstallerLauncher;
use crate::paths::{FilePath, FolderPath, InstallerPath, ValidatedPath, ZipPath};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

type ErrorFactory = Box<dyn Fn() -> UpdraftError + Send + Sync>;

/// [`ReleaseSource`] answering from a fixed list of releases.
pub struct FakeReleaseSource {
    releases: Vec<ReleaseInfo>,
    error: Option<ErrorFactory>,
    calls: AtomicUsize,
}

impl FakeReleaseSource {
    /// Serve `release` as the latest release.
    pub fn with_release(release: ReleaseInfo) -> Self {
        Self::with_releases(vec![release])
    }

    /// Serve `releases`; the first one is "latest".
    pub fn with_releases(releases: Vec<ReleaseInfo>) -> Self {
        Self {
            releases,
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every request with the error `make` builds.
    pub fn failing(make: impl Fn() -> UpdraftError + Send + Sync + 'static) -> Self {
        Self {
            releases: Vec::new(),
            error: Some(Box::new(make)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests served
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self) -> Result<(), UpdraftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    fn not_found(repo: &Repository) -> UpdraftError {
        UpdraftError::HttpStatus {
            url: format!("fake://{repo}/releases"),
            status: 404,
        }
    }
}

#[async_trait]
impl ReleaseSource for FakeReleaseSource {
    async fn latest_release(&self, repo: &Repository) -> Result<ReleaseInfo, UpdraftError> {
        self.respond()?;
        self.releases.first().cloned().ok_or_else(|| Self::not_found(repo))
    }

    async fn release_by_tag(&self, repo: &Repository, tag: &str) -> Result<ReleaseInfo, UpdraftError> {
        self.respond()?;
        self.releases.iter().find(|r| r.tag_name == tag).cloned().ok_or_else(|| Self::not_found(repo))
    }

    async fn releases(&self, _repo: &Repository) -> Result<Vec<ReleaseInfo>, UpdraftError> {
        self.respond()?;
        Ok(self.releases.clone())
    }
}

/// [`ArchiveDownloader`] that writes canned bytes instead of touching the network.
pub struct RecordingDownloader {
    body: Vec<u8>,
    error: Option<ErrorFactory>,
    urls: Mutex<Vec<String>>,
}

impl RecordingDownloader {
    /// Write `body` to the destination on every download.
    pub fn serving(body: Vec<u8>) -> Self {
        Self {
            body,
            error: None,
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every download with the error `make` builds.
    pub fn failing(make: impl Fn() -> UpdraftError + Send + Sync + 'static) -> Self {
        Self {
            body: Vec::new(),
            error: Some(Box::new(make)),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// URLs requested so far
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().map(|u| u.clone()).unwrap_or_default()
    }

    /// Number of downloads attempted
    pub fn calls(&self) -> usize {
        self.urls().len()
    }
}

#[async_trait]
impl ArchiveDownloader for RecordingDownloader {
    async fn download(
        &self,
        url: &str,
        destination: &FilePath,
        _cancel: &CancellationToken,
    ) -> Result<u64, UpdraftError> {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(url.to_string());
        }
        if let Some(make) = &self.error {
            return Err(make());
        }

        let path = destination.as_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| UpdraftError::from_io(e, "create folder", parent.display().to_string()))?;
        }
        tokio::fs::write(path, &self.body)
            .await
            .map_err(|e| UpdraftError::from_io(e, "write archive", destination.to_string()))?;
        Ok(self.body.len() as u64)
    }
}

/// [`ArchiveExtractor`] that counts calls and delegates to [`ZipExtractor`].
#[derive(Default)]
pub struct RecordingExtractor {
    calls: AtomicUsize,
}

impl RecordingExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of extractions attempted
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArchiveExtractor for RecordingExtractor {
    async fn extract(
        &self,
        archive: &ZipPath,
        destination: &FolderPath,
        overwrite: bool,
        cancel: &CancellationToken,
    ) -> Result<ExtractionReport, UpdraftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ZipExtractor.extract(archive, destination, overwrite, cancel).await
    }
}

/// [`InstallerLauncher`] that records what it would have started.
#[derive(Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<(InstallerPath, bool)>>,
    error: Option<ErrorFactory>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every launch with the error `make` builds.
    pub fn failing(make: impl Fn() -> UpdraftError + Send + Sync + 'static) -> Self {
        Self {
            launched: Mutex::new(Vec::new()),
            error: Some(Box::new(make)),
        }
    }

    /// Installers launched so far, with the elevation flag
    pub fn launched(&self) -> Vec<(InstallerPath, bool)> {
        self.launched.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Number of launches attempted
    pub fn calls(&self) -> usize {
        self.launched().len()
    }
}

#[async_trait]
impl InstallerLauncher for RecordingLauncher {
    async fn launch(&self, exe: &InstallerPath, require_elevation: bool) -> Result<(), UpdraftError> {
        if let Ok(mut launched) = self.launched.lock() {
            launched.push((exe.clone(), require_elevation));
        }
        match &self.error {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}
