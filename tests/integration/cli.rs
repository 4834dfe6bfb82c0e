//! Smoke tests of the `updraft` binary.

use crate::common::{MockGithub, TestWorkspace};
use assert_cmd::Command;
use predicates::prelude::*;
use updraft::test_utils::{ReleaseFixture, ZipFixture};

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("updraft").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("find-installer"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("updraft").unwrap();
    cmd.arg("--version").assert().success().stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bad_repository_exits_with_error() {
    let workspace = TestWorkspace::new().unwrap();
    let output = workspace.run_updraft(&["check", "not-a-slug"]).unwrap();

    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Invalid repository"), "{}", output.stderr);
    assert!(output.stderr.contains("owner/name"));
}

#[tokio::test]
async fn test_check_reports_update() {
    let github = MockGithub::start().await;
    github.mount_latest(&ReleaseFixture::new("v3.2.0")).await;
    let workspace = TestWorkspace::new().unwrap().with_api(&github.uri()).unwrap();

    let output = workspace.run_updraft(&["check", "owner/repo", "--current", "v3.1.5"]).unwrap();

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("v3.1.5 -> v3.2.0"), "{}", output.stdout);
}

#[tokio::test]
async fn test_check_json_output() {
    let github = MockGithub::start().await;
    github.mount_latest(&ReleaseFixture::new("v3.1.5")).await;
    let workspace = TestWorkspace::new().unwrap().with_api(&github.uri()).unwrap();

    let output = workspace.run_updraft(&["check", "owner/repo", "--current", "3.1.5", "--format", "json"]).unwrap();

    assert!(output.success, "{}", output.stderr);
    let json: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["kind"], "UpdateAlreadyInstalled");
    assert_eq!(json["value"]["latest"], "v3.1.5");
    assert_eq!(json["value"]["update_available"], false);
}

#[tokio::test]
async fn test_run_without_setup_extracts_release() {
    let github = MockGithub::start().await;
    let url = github.archive_url("app.zip");
    github.mount_latest(&ReleaseFixture::new("v3.2.0").zipball_url(Some(&url))).await;
    github.mount_archive("app.zip", &ZipFixture::release_snapshot("owner-repo-abc")).await.unwrap();
    let workspace = TestWorkspace::new().unwrap().with_api(&github.uri()).unwrap();

    let target = workspace.folder("update");
    let output = workspace
        .run_updraft(&["run", "owner/repo", "--zip", &target, "--extract-to", &target, "--no-setup"])
        .unwrap();

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("setup not started"), "{}", output.stdout);
    assert!(workspace.path("update").join("owner-repo-abc").join("setup.exe").is_file());
}

#[test]
fn test_extract_and_find_installer() {
    let workspace = TestWorkspace::new().unwrap();
    let zip = ZipFixture::release_snapshot("owner-repo-abc").write_to(&workspace.path("update.zip")).unwrap();
    let out = workspace.folder("out");

    let output = workspace.run_updraft(&["extract", &zip.to_string_lossy(), &out]).unwrap();
    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("owner-repo-abc"));

    let output = workspace.run_updraft(&["find-installer", &out]).unwrap();
    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.trim().ends_with("setup.exe"), "{}", output.stdout);
}

#[test]
fn test_find_installer_not_found() {
    let workspace = TestWorkspace::new().unwrap();
    let empty = workspace.folder("empty");
    std::fs::create_dir_all(workspace.path("empty")).unwrap();

    let output = workspace.run_updraft(&["find-installer", &empty, "--token", "install"]).unwrap();

    assert!(!output.success);
    assert!(output.stderr.contains("No installer found"), "{}", output.stderr);
}
