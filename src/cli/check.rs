//! `updraft check`: is there a newer release?
//!
//! ```bash
//! updraft check octocat/hello-world --current v3.1.5
//! updraft check octocat/hello-world --current v3.1.5 --allow-preview --format json
//! ```
//!
//! Exits `0` whether or not an update exists; the answer is printed. Use `--format
//! json` to get the full [`VersionInfo`] for scripting.

use super::into_outcome;
use crate::config::UpdateSettings;
use crate::github::Repository;
use crate::update::{VersionInfo, check_for_updates};
use crate::version::VersionTag;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

/// Compare the latest release of a repository with an installed version.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Repository as `owner/name`
    #[arg(value_name = "OWNER/REPO")]
    pub repository: String,

    /// Installed version; without it any release counts as an update
    #[arg(long, value_name = "VERSION")]
    pub current: Option<String>,

    /// Consider pre-releases too
    #[arg(long)]
    pub allow_preview: bool,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

impl CheckCommand {
    /// Run the check and print the answer.
    pub async fn execute(self, settings: &UpdateSettings, cancel: &CancellationToken) -> Result<()> {
        let repository = Repository::parse(&self.repository)?;
        let current = self.current.as_deref().map(VersionTag::parse).transpose()?;

        let result = check_for_updates(
            repository.owner(),
            repository.name(),
            current,
            self.allow_preview,
            settings,
            cancel,
        )
        .await;
        let result = into_outcome(result)?;

        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }

        if let Some(info) = &result.value {
            print_summary(&repository, current.as_ref(), info);
        }
        Ok(())
    }
}

fn print_summary(repository: &Repository, current: Option<&VersionTag>, info: &VersionInfo) {
    let installed = current.map_or_else(|| "unknown".to_string(), ToString::to_string);
    if info.update_available {
        println!(
            "{} {} -> {}",
            repository.to_string().bold(),
            installed.yellow(),
            info.latest.to_string().green()
        );
        if let Some(url) = &info.release.html_url {
            println!("  {url}");
        }
    } else {
        println!("{} {} is up to date", repository.to_string().bold(), installed.green());
    }
}
