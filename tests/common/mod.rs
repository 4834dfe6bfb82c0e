//! Shared helpers for the integration tests: a mock GitHub server and a CLI runner.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;
use updraft::config::UpdateSettings;
use updraft::test_utils::{ReleaseFixture, ZipFixture};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OWNER: &str = "owner";
pub const REPO: &str = "repo";

/// A `MockServer` playing both the GitHub API and the download host.
pub struct MockGithub {
    pub server: MockServer,
}

impl MockGithub {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// URL the mock serves archives under.
    pub fn archive_url(&self, name: &str) -> String {
        format!("{}/downloads/{name}", self.server.uri())
    }

    /// Serve `release` at `/repos/owner/repo/releases/latest`.
    pub async fn mount_latest(&self, release: &ReleaseFixture) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{OWNER}/{REPO}/releases/latest")))
            .respond_with(ResponseTemplate::new(200).set_body_json(release.to_json()))
            .mount(&self.server)
            .await;
    }

    /// Serve `releases` at `/repos/owner/repo/releases`.
    pub async fn mount_releases(&self, releases: &[ReleaseFixture]) {
        let body: Vec<serde_json::Value> = releases.iter().map(ReleaseFixture::to_json).collect();
        Mock::given(method("GET"))
            .and(path(format!("/repos/{OWNER}/{REPO}/releases")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serve a zip archive at [`archive_url`](Self::archive_url)`(name)`.
    pub async fn mount_archive(&self, name: &str, archive: &ZipFixture) -> Result<()> {
        let bytes = archive.to_bytes()?;
        Mock::given(method("GET"))
            .and(path(format!("/downloads/{name}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/zip")
                    .set_body_bytes(bytes),
            )
            .mount(&self.server)
            .await;
        Ok(())
    }

    /// Answer `route` with `status` and an empty body.
    pub async fn mount_status(&self, route: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(route.to_string()))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Settings pointing the client at this server.
    pub fn settings(&self) -> UpdateSettings {
        UpdateSettings {
            api_base_url: self.uri(),
            ..UpdateSettings::default()
        }
    }
}

/// Output of one CLI invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

/// A temporary working area with its own config file.
pub struct TestWorkspace {
    _temp: TempDir,
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let root = temp.path().to_path_buf();
        let config_path = root.join("config.toml");
        fs::write(&config_path, "")?;
        Ok(Self {
            _temp: temp,
            root,
            config_path,
        })
    }

    /// Point the config file at `api_base_url`.
    pub fn with_api(self, api_base_url: &str) -> Result<Self> {
        fs::write(&self.config_path, format!("api_base_url = \"{api_base_url}\"\ntimeout_secs = 5\n"))?;
        Ok(self)
    }

    /// Path under the workspace as a string, with a trailing separator for folders.
    pub fn folder(&self, name: &str) -> String {
        let mut text = self.root.join(name).to_string_lossy().into_owned();
        text.push(std::path::MAIN_SEPARATOR);
        text
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Run the `updraft` binary with this workspace's config.
    pub fn run_updraft(&self, args: &[&str]) -> Result<CommandOutput> {
        let binary = env!("CARGO_BIN_EXE_updraft");
        let output = Command::new(binary)
            .arg("--no-progress")
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .current_dir(&self.root)
            .env_remove("UPDRAFT_GITHUB_TOKEN")
            .env("NO_COLOR", "1")
            .output()
            .context("Failed to run updraft")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

