//! Single-stage commands: `download`, `extract`, `find-installer`, `launch`.
//!
//! These run one step of the update on its own, which is handy when scripting a
//! custom flow or debugging a release that does not update cleanly.

use super::into_outcome;
use crate::config::UpdateSettings;
use crate::paths::{FolderPath, InstallerPath, ZipPath};
use crate::update::{download_zip, extract_zip_file, launch_setup, locate_setup};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

/// Download a URL into a file.
#[derive(Debug, Args)]
pub struct DownloadCommand {
    /// URL to download
    pub url: String,

    /// Destination file; a folder gets `update.zip` appended
    #[arg(value_name = "PATH")]
    pub destination: String,
}

impl DownloadCommand {
    /// Download and report the number of bytes written.
    pub async fn execute(self, settings: &UpdateSettings, cancel: &CancellationToken) -> Result<()> {
        let destination = ZipPath::new(&self.destination)?;
        let result = into_outcome(download_zip(&self.url, &destination, settings, cancel).await)?;
        println!("{} {}", "✓".green(), result.message);
        Ok(())
    }
}

/// Expand a zip archive.
#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Archive to expand
    #[arg(value_name = "ZIP")]
    pub archive: String,

    /// Destination folder
    #[arg(value_name = "FOLDER")]
    pub destination: String,

    /// Fail instead of replacing files that already exist
    #[arg(long)]
    pub no_overwrite: bool,
}

impl ExtractCommand {
    /// Extract and list the top-level entries created.
    pub async fn execute(self, settings: &UpdateSettings, cancel: &CancellationToken) -> Result<()> {
        let archive = ZipPath::new(&self.archive)?;
        let destination = FolderPath::new(&self.destination)?;
        let overwrite = settings.overwrite && !self.no_overwrite;

        let result = into_outcome(extract_zip_file(&archive, &destination, overwrite, cancel).await)?;
        println!("{} {}", "✓".green(), result.message);
        if let Some(report) = &result.value {
            for entry in &report.root_entries {
                println!("  {}", entry.display());
            }
        }
        Ok(())
    }
}

/// Search an extracted tree for the installer.
#[derive(Debug, Args)]
pub struct FindInstallerCommand {
    /// Folder to search
    #[arg(value_name = "FOLDER")]
    pub folder: String,

    /// Token the file name must contain; repeat for several (default from config)
    #[arg(long = "token", value_name = "TOKEN")]
    pub tokens: Vec<String>,
}

impl FindInstallerCommand {
    /// Print the installer path.
    pub fn execute(self, settings: &UpdateSettings) -> Result<()> {
        let folder = FolderPath::new(&self.folder)?;
        let tokens = if self.tokens.is_empty() {
            &settings.installer_tokens
        } else {
            &self.tokens
        };

        let result = into_outcome(locate_setup(&folder, tokens))?;
        if let Some(installer) = &result.value {
            println!("{installer}");
        }
        Ok(())
    }
}

/// Start an installer.
#[derive(Debug, Args)]
pub struct LaunchCommand {
    /// Installer executable
    #[arg(value_name = "EXE")]
    pub installer: String,

    /// Request elevated privileges
    #[arg(long)]
    pub elevate: bool,
}

impl LaunchCommand {
    /// Start the installer detached.
    pub async fn execute(self, settings: &UpdateSettings) -> Result<()> {
        let installer = match &settings.installer_rule {
            Some(rule) => InstallerPath::with_rule(&self.installer, rule)?,
            None => InstallerPath::new(&self.installer)?,
        };
        let elevate = self.elevate || settings.require_elevation;

        let result = into_outcome(launch_setup(&installer, elevate).await)?;
        println!("{} {}", "✓".green(), result.message);
        Ok(())
    }
}
