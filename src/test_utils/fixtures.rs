//! Test fixtures for archives and release metadata

use crate::github::ReleaseInfo;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// One entry of a [`ZipFixture`].
#[derive(Clone, Debug)]
enum ZipEntry {
    File {
        name: String,
        content: Vec<u8>,
        mode: Option<u32>,
    },
    Directory(String),
}

/// Builder for zip archives shaped like GitHub release snapshots.
#[derive(Clone, Debug, Default)]
pub struct ZipFixture {
    entries: Vec<ZipEntry>,
}

impl ZipFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual snapshot layout: `{root}/README.md` and `{root}/setup.exe`.
    pub fn release_snapshot(root: &str) -> Self {
        Self::new()
            .directory(&format!("{root}/"))
            .file(&format!("{root}/README.md"), b"# release\n")
            .executable(&format!("{root}/setup.exe"), b"#!/bin/sh\nexit 0\n")
    }

    /// Add a regular file.
    pub fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(ZipEntry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: None,
        });
        self
    }

    /// Add a file with mode `0o755`.
    pub fn executable(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(ZipEntry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: Some(0o755),
        });
        self
    }

    /// Add an explicit directory entry (`name` should end with `/`).
    pub fn directory(mut self, name: &str) -> Self {
        self.entries.push(ZipEntry::Directory(name.to_string()));
        self
    }

    /// Encode the archive in memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for entry in &self.entries {
            match entry {
                ZipEntry::File {
                    name,
                    content,
                    mode,
                } => {
                    let mut options = SimpleFileOptions::default();
                    if let Some(mode) = mode {
                        options = options.unix_permissions(*mode);
                    }
                    writer.start_file(name.as_str(), options).context("start zip entry")?;
                    writer.write_all(content).context("write zip entry")?;
                }
                ZipEntry::Directory(name) => {
                    writer
                        .add_directory(name.as_str(), SimpleFileOptions::default())
                        .context("add zip directory")?;
                }
            }
        }
        Ok(writer.finish().context("finish zip")?.into_inner())
    }

    /// Write the archive to `path`, creating parent folders.
    pub fn write_to(&self, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        file.write_all(&self.to_bytes()?)?;
        Ok(path.to_path_buf())
    }
}

/// Builder for GitHub release JSON bodies.
#[derive(Clone, Debug)]
pub struct ReleaseFixture {
    tag: String,
    prerelease: bool,
    draft: bool,
    zipball_url: Option<String>,
    assets: Vec<(String, String)>,
}

impl ReleaseFixture {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            prerelease: false,
            draft: false,
            zipball_url: Some(format!("https://api.github.com/repos/owner/repo/zipball/{tag}")),
            assets: Vec::new(),
        }
    }

    pub fn prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    pub fn draft(mut self, draft: bool) -> Self {
        self.draft = draft;
        self
    }

    pub fn zipball_url(mut self, url: Option<&str>) -> Self {
        self.zipball_url = url.map(str::to_string);
        self
    }

    pub fn asset(mut self, name: &str, url: &str) -> Self {
        self.assets.push((name.to_string(), url.to_string()));
        self
    }

    /// The JSON body GitHub would return for this release.
    pub fn to_json(&self) -> serde_json::Value {
        let assets: Vec<serde_json::Value> = self
            .assets
            .iter()
            .map(|(name, url)| {
                serde_json::json!({
                    "name": name,
                    "browser_download_url": url,
                    "size": 1024,
                    "content_type": "application/zip",
                })
            })
            .collect();

        serde_json::json!({
            "tag_name": self.tag,
            "name": format!("Release {}", self.tag),
            "html_url": format!("https://github.com/owner/repo/releases/tag/{}", self.tag),
            "zipball_url": self.zipball_url,
            "prerelease": self.prerelease,
            "draft": self.draft,
            "published_at": "2024-05-01T12:00:00Z",
            "assets": assets,
        })
    }

    /// The decoded release.
    pub fn build(&self) -> ReleaseInfo {
        serde_json::from_value(self.to_json()).unwrap_or_else(|e| panic!("release fixture does not decode: {e}"))
    }
}
