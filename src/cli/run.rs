//! `updraft run`: the full update pipeline.
//!
//! ```bash
//! updraft run octocat/hello-world --zip /tmp/hello/ --extract-to /tmp/hello/ \
//!     --current v3.1.5 --no-preview --tidy
//! ```
//!
//! Prints the final result and the status history. With `--no-setup` the archive is
//! only downloaded and extracted.

use super::into_outcome;
use crate::config::UpdateSettings;
use crate::github::Repository;
use crate::update::{UpdateSession, Updater};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

/// Run the full update for a repository.
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Repository as `owner/name`
    #[arg(value_name = "OWNER/REPO")]
    pub repository: String,

    /// Where to download the archive; a folder gets `update.zip` appended
    #[arg(long, value_name = "PATH")]
    pub zip: String,

    /// Folder to extract the archive into
    #[arg(long, value_name = "FOLDER")]
    pub extract_to: String,

    /// Installed version; the update only runs for a newer release
    #[arg(long, value_name = "VERSION")]
    pub current: Option<String>,

    /// Stop when the latest release is a pre-release
    #[arg(long)]
    pub no_preview: bool,

    /// Download and extract only, do not start the installer
    #[arg(long)]
    pub no_setup: bool,

    /// Remove the archive and extracted files after starting the installer
    #[arg(long)]
    pub tidy: bool,

    /// Start the installer with elevated privileges
    #[arg(long)]
    pub elevate: bool,
}

impl RunCommand {
    /// Build and run the pipeline.
    pub async fn execute(self, mut settings: UpdateSettings, cancel: &CancellationToken) -> Result<()> {
        let repository = Repository::parse(&self.repository)?;
        if self.elevate {
            settings.require_elevation = true;
        }

        let mut builder = Updater::create(repository.owner(), repository.name())?
            .where_paths(&self.zip, &self.extract_to)?
            .run_update()
            .starts_setup(!self.no_setup)
            .tidies_up(self.tidy)
            .with_settings(settings);
        if let Some(current) = &self.current {
            builder = builder.if_version_bigger_than_str(current)?;
        }
        if self.no_preview {
            builder = builder.if_not_preview();
        }

        let result = builder.build()?.run(cancel).await;
        if let Some(session) = &result.value {
            print_history(session);
        }

        let result = into_outcome(result)?;
        println!("{} {}", "✓".green(), result.message);
        Ok(())
    }
}

fn print_history(session: &UpdateSession) {
    if let Some(latest) = session.latest_version() {
        println!("Latest release: {}", latest.to_string().bold());
    }
    let statuses: Vec<String> = session.history().iter().map(|s| s.to_string()).collect();
    if !statuses.is_empty() {
        println!("Stages: {}", statuses.join(" -> ").dimmed());
    }
}
