//! Full runs over real HTTP and real zip archives. Only the launcher is faked.

use crate::common::{MockGithub, OWNER, REPO};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use updraft::core::ResultKind;
use updraft::paths::ValidatedPath;
use updraft::test_utils::{RecordingLauncher, ReleaseFixture, ZipFixture};
use updraft::update::Updater;
use updraft::version::VersionTag;

fn folder(temp: &TempDir, name: &str) -> String {
    let mut text = temp.path().join(name).to_string_lossy().into_owned();
    text.push(std::path::MAIN_SEPARATOR);
    text
}

#[tokio::test]
async fn test_new_version_is_downloaded_extracted_and_launched() {
    updraft::test_utils::init_test_logging(None);
    let github = MockGithub::start().await;
    let archive_url = github.archive_url("app.zip");
    github.mount_latest(&ReleaseFixture::new("v3.2.0").zipball_url(Some(&archive_url))).await;
    github.mount_archive("app.zip", &ZipFixture::release_snapshot("owner-repo-abc123")).await.unwrap();

    let temp = TempDir::new().unwrap();
    let launcher = Arc::new(RecordingLauncher::new());
    let result = Updater::create(OWNER, REPO)
        .unwrap()
        .where_paths(folder(&temp, "temp"), folder(&temp, "temp"))
        .unwrap()
        .run_update()
        .if_version_bigger_than(VersionTag::parse("v3.1.5").unwrap())
        .with_settings(github.settings())
        .with_launcher(launcher.clone())
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert!(result.success, "{result}");
    assert_eq!(result.kind, ResultKind::Completed);

    let extracted = temp.path().join("temp").join("owner-repo-abc123");
    assert!(temp.path().join("temp").join("update.zip").is_file());
    assert!(extracted.join("README.md").is_file());
    assert_eq!(launcher.launched()[0].0.as_path(), extracted.join("setup.exe").as_path());

    let session = result.value.unwrap();
    assert_eq!(session.download_url(), Some(archive_url.as_str()));
    assert_eq!(session.extracted_entries(), &[extracted]);
}

#[tokio::test]
async fn test_up_to_date_never_downloads() {
    let github = MockGithub::start().await;
    github.mount_latest(&ReleaseFixture::new("v3.1.5").zipball_url(Some(&github.archive_url("app.zip")))).await;

    let temp = TempDir::new().unwrap();
    let result = Updater::create(OWNER, REPO)
        .unwrap()
        .where_paths(folder(&temp, "u"), folder(&temp, "u"))
        .unwrap()
        .run_update()
        .if_version_bigger_than_str("v3.1.5")
        .unwrap()
        .with_settings(github.settings())
        .with_launcher(Arc::new(RecordingLauncher::new()))
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert_eq!(result.kind, ResultKind::UpdateAlreadyInstalled);
    assert!(!temp.path().join("u").exists());

    let requests = github.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_missing_archive_is_http_status() {
    let github = MockGithub::start().await;
    github.mount_latest(&ReleaseFixture::new("v3.2.0").zipball_url(Some(&github.archive_url("gone.zip")))).await;
    github.mount_status("/downloads/gone.zip", 404).await;

    let temp = TempDir::new().unwrap();
    let result = Updater::create(OWNER, REPO)
        .unwrap()
        .where_paths(folder(&temp, "d"), folder(&temp, "d"))
        .unwrap()
        .run_update()
        .with_settings(github.settings())
        .with_launcher(Arc::new(RecordingLauncher::new()))
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert!(!result.success);
    assert_eq!(result.kind, ResultKind::HttpStatus);
    assert!(!temp.path().join("d").join("update.zip").exists());
}

#[tokio::test]
async fn test_corrupt_archive_stops_before_locator() {
    let github = MockGithub::start().await;
    let url = github.archive_url("broken.zip");
    github.mount_latest(&ReleaseFixture::new("v3.2.0").zipball_url(Some(&url))).await;
    wiremock::Mock::given(wiremock::matchers::path("/downloads/broken.zip"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_bytes(b"definitely not a zip".to_vec()))
        .mount(&github.server)
        .await;

    let temp = TempDir::new().unwrap();
    let launcher = Arc::new(RecordingLauncher::new());
    let result = Updater::create(OWNER, REPO)
        .unwrap()
        .where_paths(folder(&temp, "c"), folder(&temp, "c"))
        .unwrap()
        .run_update()
        .with_settings(github.settings())
        .with_launcher(launcher.clone())
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert_eq!(result.kind, ResultKind::ArchiveCorrupt);
    assert_eq!(launcher.calls(), 0);
}

#[tokio::test]
async fn test_release_without_archive_is_malformed() {
    let github = MockGithub::start().await;
    github.mount_latest(&ReleaseFixture::new("v3.2.0").zipball_url(None)).await;

    let temp = TempDir::new().unwrap();
    let result = Updater::create(OWNER, REPO)
        .unwrap()
        .where_paths(folder(&temp, "m"), folder(&temp, "m"))
        .unwrap()
        .run_update()
        .with_settings(github.settings())
        .with_launcher(Arc::new(RecordingLauncher::new()))
        .build()
        .unwrap()
        .run(&CancellationToken::new())
        .await;

    assert_eq!(result.kind, ResultKind::MalformedResponse);
}
