//! The one-shot stage helpers.

use crate::common::{MockGithub, OWNER, REPO};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use updraft::core::ResultKind;
use updraft::paths::{FolderPath, InstallerPath, ValidatedPath, ZipPath};
use updraft::test_utils::{ReleaseFixture, ZipFixture};
use updraft::update::{check_for_updates, download_zip, extract_zip_file, launch_setup, locate_setup};
use updraft::version::VersionTag;

#[tokio::test]
async fn test_check_for_updates_reports_newer_release() {
    let github = MockGithub::start().await;
    github.mount_latest(&ReleaseFixture::new("v3.2.0")).await;

    let result = check_for_updates(
        OWNER,
        REPO,
        Some(VersionTag::new(3, 1, 5)),
        false,
        &github.settings(),
        &CancellationToken::new(),
    )
    .await;

    assert!(result.success);
    assert_eq!(result.kind, ResultKind::UpdateAvailable);
    let info = result.value.unwrap();
    assert!(info.update_available);
    assert_eq!(info.latest, VersionTag::new(3, 2, 0));
}

#[tokio::test]
async fn test_check_for_updates_with_prereleases_uses_release_list() {
    let github = MockGithub::start().await;
    github.mount_releases(&[ReleaseFixture::new("v3.2.0"), ReleaseFixture::new("v4.0.0-beta").prerelease(true)]).await;

    let result = check_for_updates(OWNER, REPO, None, true, &github.settings(), &CancellationToken::new()).await;

    assert_eq!(result.kind, ResultKind::UpdateAvailable);
    assert_eq!(result.value.unwrap().release.tag_name, "v4.0.0-beta");
}

#[tokio::test]
async fn test_download_zip_writes_file() {
    let github = MockGithub::start().await;
    let archive = ZipFixture::release_snapshot("r");
    github.mount_archive("a.zip", &archive).await.unwrap();

    let temp = TempDir::new().unwrap();
    let zip = ZipPath::new(temp.path().join("nested").join("a.zip").to_string_lossy()).unwrap();
    let result = download_zip(&github.archive_url("a.zip"), &zip, &github.settings(), &CancellationToken::new()).await;

    assert!(result.success, "{result}");
    assert_eq!(result.value, Some(archive.to_bytes().unwrap().len() as u64));
    assert!(zip.path_exists());
}

#[tokio::test]
async fn test_download_zip_rejects_bad_url() {
    let temp = TempDir::new().unwrap();
    let zip = ZipPath::new(temp.path().to_string_lossy() + "/").unwrap();
    let result = download_zip("not a url", &zip, &Default::default(), &CancellationToken::new()).await;

    assert_eq!(result.kind, ResultKind::InvalidUrl);
    assert!(!zip.path_exists());
}

#[tokio::test]
async fn test_extract_then_locate_then_launch() {
    let temp = TempDir::new().unwrap();
    let zip_file = ZipFixture::release_snapshot("owner-repo-1a2b")
        .file("owner-repo-1a2b/docs/setup-guide.txt", b"not an installer")
        .write_to(&temp.path().join("update.zip"))
        .unwrap();
    let zip = ZipPath::new(zip_file.to_string_lossy()).unwrap();
    let folder = FolderPath::new(temp.path().join("out").to_string_lossy() + "/").unwrap();

    let extracted = extract_zip_file(&zip, &folder, true, &CancellationToken::new()).await;
    assert!(extracted.success, "{extracted}");
    assert_eq!(extracted.value.as_ref().unwrap().files_written, 3);

    let located = locate_setup(&folder, &["setup", "exe"]);
    let installer = located.value.unwrap();
    assert_eq!(installer.file_name(), Some("setup.exe"));

    // Repeated searches over an unchanged tree agree
    assert_eq!(locate_setup(&folder, &["setup", "exe"]).value, Some(installer.clone()));

    #[cfg(unix)]
    {
        let launched = launch_setup(&installer, false).await;
        assert!(launched.success, "{launched}");
    }
}

#[test]
fn test_locate_setup_with_custom_tokens() {
    let temp = TempDir::new().unwrap();
    let exe = temp.path().join("app").join("MyApp-Installer.exe");
    std::fs::create_dir_all(exe.parent().unwrap()).unwrap();
    std::fs::write(&exe, b"MZ").unwrap();
    let folder = FolderPath::new(temp.path().to_string_lossy() + "/").unwrap();

    let located = locate_setup(&folder, &["installer", "exe"]);
    assert!(located.success, "{located}");
    assert_eq!(located.value.unwrap().file_name(), Some("MyApp-Installer.exe"));
}

#[tokio::test]
async fn test_extract_missing_archive() {
    let temp = TempDir::new().unwrap();
    let zip = ZipPath::new(temp.path().join("missing.zip").to_string_lossy()).unwrap();
    let folder = FolderPath::new(temp.path().to_string_lossy() + "/").unwrap();

    let result = extract_zip_file(&zip, &folder, true, &CancellationToken::new()).await;
    assert_eq!(result.kind, ResultKind::ArchiveMissing);
}

#[tokio::test]
async fn test_launch_missing_installer() {
    let temp = TempDir::new().unwrap();
    let exe = InstallerPath::new(temp.path().join("setup.exe").to_string_lossy()).unwrap();

    let result = launch_setup(&exe, false).await;
    assert_eq!(result.kind, ResultKind::FileNotFound);
}
