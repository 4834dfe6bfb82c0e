//! Pipeline scenarios driven entirely by recording fakes.

use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use updraft::config::UpdateSettings;
use updraft::core::{ResultKind, UpdraftError};
use updraft::paths::ValidatedPath;
use updraft::test_utils::{
    FakeReleaseSource, RecordingDownloader, RecordingExtractor, RecordingLauncher, ReleaseFixture, ZipFixture,
};
use updraft::update::{PipelineState, UpdateStage, UpdateStatus, Updater};
use updraft::version::VersionTag;

struct Fakes {
    source: Arc<FakeReleaseSource>,
    downloader: Arc<RecordingDownloader>,
    extractor: Arc<RecordingExtractor>,
    launcher: Arc<RecordingLauncher>,
}

impl Fakes {
    fn new(release: ReleaseFixture, archive: &ZipFixture) -> Self {
        Self::with(
            FakeReleaseSource::with_release(release.build()),
            RecordingDownloader::serving(archive.to_bytes().unwrap()),
            RecordingLauncher::new(),
        )
    }

    fn with(source: FakeReleaseSource, downloader: RecordingDownloader, launcher: RecordingLauncher) -> Self {
        Self {
            source: Arc::new(source),
            downloader: Arc::new(downloader),
            extractor: Arc::new(RecordingExtractor::new()),
            launcher: Arc::new(launcher),
        }
    }
}

fn folder(temp: &TempDir) -> String {
    let mut text = temp.path().to_string_lossy().into_owned();
    text.push(std::path::MAIN_SEPARATOR);
    text
}

fn builder(temp: &TempDir, fakes: &Fakes) -> updraft::update::UpdateBuilder<updraft::update::Configuring> {
    let root = folder(temp);
    Updater::create("owner", "repo")
        .unwrap()
        .where_paths(&root, &root)
        .unwrap()
        .run_update()
        .with_release_source(fakes.source.clone())
        .with_downloader(fakes.downloader.clone())
        .with_extractor(fakes.extractor.clone())
        .with_launcher(fakes.launcher.clone())
}

#[tokio::test]
async fn test_up_to_date_skips_download() {
    updraft::test_utils::init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v3.1.5"), &ZipFixture::release_snapshot("owner-repo-abc"));

    let result = builder(&temp, &fakes)
        .if_version_bigger_than(VersionTag::parse("v3.1.5").unwrap())
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert!(result.success);
    assert_eq!(result.kind, ResultKind::UpdateAlreadyInstalled);
    assert_eq!(fakes.source.calls(), 1);
    assert_eq!(fakes.downloader.calls(), 0);
    assert_eq!(fakes.extractor.calls(), 0);

    let session = result.value.unwrap();
    assert_eq!(session.latest_version(), Some(&VersionTag::new(3, 1, 5)));
    assert_eq!(session.history().as_slice(), &[UpdateStatus::Completed]);
    assert_eq!(session.state(), PipelineState::UpdateAlreadyCurrent);
}

#[tokio::test]
async fn test_new_version_runs_every_stage() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v3.2.0"), &ZipFixture::release_snapshot("owner-repo-abc123"));

    let result = builder(&temp, &fakes)
        .if_version_bigger_than(VersionTag::parse("v3.1.5").unwrap())
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert!(result.success, "{result}");
    assert_eq!(result.kind, ResultKind::Completed);
    assert_eq!(fakes.downloader.urls(), vec!["https://api.github.com/repos/owner/repo/zipball/v3.2.0"]);
    assert_eq!(fakes.extractor.calls(), 1);

    let expected = temp.path().join("owner-repo-abc123").join("setup.exe");
    let launched = fakes.launcher.launched();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].0.as_path(), expected.as_path());
    assert!(!launched[0].1);

    let session = result.value.unwrap();
    assert!(!session.is_updating());
    assert_eq!(session.state(), PipelineState::Completed);
    assert_eq!(session.installer_path().map(|p| p.as_path().to_path_buf()), Some(expected));
    assert_eq!(
        session.history().as_slice(),
        &[
            UpdateStatus::Downloading,
            UpdateStatus::DownloadCompleted,
            UpdateStatus::Extracting,
            UpdateStatus::ExtractionCompleted,
            UpdateStatus::Launching,
            UpdateStatus::LaunchingCompleted,
            UpdateStatus::Completed,
        ]
    );
    assert!(temp.path().join("update.zip").exists());
}

#[tokio::test]
async fn test_preview_rejected_before_download() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v4.0.0-beta"), &ZipFixture::release_snapshot("r"));

    let result = builder(&temp, &fakes)
        .if_version_bigger_than(VersionTag::new(3, 1, 5))
        .if_not_preview()
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert!(result.success);
    assert_eq!(result.kind, ResultKind::PreviewRejected);
    assert_eq!(fakes.downloader.calls(), 0);
}

#[tokio::test]
async fn test_prerelease_flag_counts_as_preview() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v4.0.0").prerelease(true), &ZipFixture::release_snapshot("r"));

    let result = builder(&temp, &fakes).if_not_preview().build().unwrap().run(&CancellationToken::new()).await;

    assert_eq!(result.kind, ResultKind::PreviewRejected);
    assert_eq!(fakes.downloader.calls(), 0);
}

#[tokio::test]
async fn test_installer_missing_names_folder() {
    let temp = TempDir::new().unwrap();
    let archive = ZipFixture::new().file("owner-repo-abc/README.md", b"no installer here");
    let fakes = Fakes::new(ReleaseFixture::new("v3.2.0"), &archive);

    let result = builder(&temp, &fakes).build().unwrap().run(&CancellationToken::new()).await;

    assert!(!result.success);
    assert_eq!(result.kind, ResultKind::SetupNotFound);
    assert!(result.message.contains(&folder(&temp)), "{}", result.message);
    assert_eq!(fakes.launcher.calls(), 0);

    let session = result.value.unwrap();
    assert_eq!(session.failure(), Some((UpdateStage::LocatingInstaller, ResultKind::SetupNotFound)));
    assert_eq!(session.current_status(), UpdateStatus::Failed);
    assert_eq!(session.state(), PipelineState::Failed);
    assert!(session.history().as_slice().contains(&UpdateStatus::LaunchingFailed));
}

#[tokio::test]
async fn test_download_failure_short_circuits() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::with(
        FakeReleaseSource::with_release(ReleaseFixture::new("v3.2.0").build()),
        RecordingDownloader::failing(|| UpdraftError::Timeout {
            url: "https://example.com/a.zip".to_string(),
        }),
        RecordingLauncher::new(),
    );

    let result = builder(&temp, &fakes).build().unwrap().run(&CancellationToken::new()).await;

    assert!(!result.success);
    assert_eq!(result.kind, ResultKind::ServerTimeout);
    assert_eq!(fakes.downloader.calls(), 1);
    assert_eq!(fakes.extractor.calls(), 0);
    assert_eq!(fakes.launcher.calls(), 0);

    let session = result.value.unwrap();
    assert_eq!(
        session.history().as_slice(),
        &[UpdateStatus::Downloading, UpdateStatus::DownloadFailed, UpdateStatus::Failed]
    );
}

#[tokio::test]
async fn test_fetch_failure_keeps_kind() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::with(
        FakeReleaseSource::failing(|| UpdraftError::HttpStatus {
            url: "https://api.github.com/repos/owner/repo/releases/latest".to_string(),
            status: 404,
        }),
        RecordingDownloader::serving(Vec::new()),
        RecordingLauncher::new(),
    );

    let result = builder(&temp, &fakes).build().unwrap().run(&CancellationToken::new()).await;

    assert_eq!(result.kind, ResultKind::HttpStatus);
    assert_eq!(fakes.downloader.calls(), 0);
    let session = result.value.unwrap();
    assert_eq!(session.failure(), Some((UpdateStage::CheckingForUpdates, ResultKind::HttpStatus)));
}

#[tokio::test]
async fn test_launch_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::with(
        FakeReleaseSource::with_release(ReleaseFixture::new("v3.2.0").build()),
        RecordingDownloader::serving(ZipFixture::release_snapshot("r").to_bytes().unwrap()),
        RecordingLauncher::failing(|| UpdraftError::LaunchFailed {
            path: "setup.exe".to_string(),
            reason: "exec format error".to_string(),
        }),
    );

    let result = builder(&temp, &fakes).build().unwrap().run(&CancellationToken::new()).await;

    assert_eq!(result.kind, ResultKind::LaunchFailed);
    let session = result.value.unwrap();
    assert!(session.installer_path().is_some());
    assert_eq!(session.failure().map(|(stage, _)| stage), Some(UpdateStage::Launching));
}

#[tokio::test]
async fn test_setup_skipped_when_disabled() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v3.2.0"), &ZipFixture::release_snapshot("r"));

    let result = builder(&temp, &fakes).starts_setup(false).build().unwrap().run(&CancellationToken::new()).await;

    assert!(result.success);
    assert_eq!(result.kind, ResultKind::SetupSkipped);
    assert_eq!(fakes.extractor.calls(), 1);
    assert_eq!(fakes.launcher.calls(), 0);
    assert!(temp.path().join("r").join("setup.exe").exists());
    assert_eq!(result.value.unwrap().state(), PipelineState::SetupSkippedByConfig);
}

#[tokio::test]
async fn test_tidy_removes_archive_and_extracted_entries_only() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("keep.txt"), "unrelated").unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v3.2.0"), &ZipFixture::release_snapshot("owner-repo-abc"));

    let result = builder(&temp, &fakes).tidies_up(true).build().unwrap().run(&CancellationToken::new()).await;

    assert_eq!(result.kind, ResultKind::Completed, "{result}");
    assert_eq!(fakes.launcher.calls(), 1);
    assert!(!temp.path().join("update.zip").exists());
    assert!(!temp.path().join("owner-repo-abc").exists());
    assert!(temp.path().join("keep.txt").exists());
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v3.2.0"), &ZipFixture::release_snapshot("r"));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = builder(&temp, &fakes).build().unwrap().run(&cancel).await;

    assert_eq!(result.kind, ResultKind::Cancelled);
    assert_eq!(fakes.source.calls(), 0);
}

#[tokio::test]
async fn test_elevation_setting_reaches_launcher() {
    let temp = TempDir::new().unwrap();
    let fakes = Fakes::new(ReleaseFixture::new("v3.2.0"), &ZipFixture::release_snapshot("r"));
    let settings = UpdateSettings {
        require_elevation: true,
        ..UpdateSettings::default()
    };

    let result = builder(&temp, &fakes).with_settings(settings).build().unwrap().run(&CancellationToken::new()).await;

    assert!(result.success);
    assert!(fakes.launcher.launched()[0].1);
}
