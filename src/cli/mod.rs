//! Command-line interface for updraft.
//!
//! Each command lives in its own module with its own argument struct and an
//! `execute` method. Commands receive the runtime [`UpdateSettings`] loaded from the
//! configuration file so they never read the environment themselves.
//!
//! # Available Commands
//!
//! ## Full Update
//! - `check` - compare the latest release with an installed version
//! - `run` - check, download, extract and launch the installer in one go
//!
//! ## Single Stages
//! - `download` - download a URL into a file
//! - `extract` - expand a zip archive into a folder
//! - `find-installer` - search an extracted tree for the installer
//! - `launch` - start an installer detached
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only print errors
//! - `--no-progress` - Disable progress bars and spinners
//! - `--config` - Path to a custom config file
//!
//! # Exit Codes
//!
//! `0` when the operation succeeded, including "already up to date" and other
//! non-error early exits. `1` on any failure, with the error printed to stderr.
//!
//! # Example
//!
//! ```bash
//! updraft --verbose check octocat/hello-world --current v3.1.5
//! updraft --no-progress run octocat/hello-world --zip /tmp/hello/ --extract-to /tmp/hello/ --tidy
//! ```

mod check;
mod run;
mod stage;

use crate::config::{UpdateSettings, UpdraftConfig};
use crate::core::ErrorContext;
use crate::update::UpdateResult;
use crate::utils::progress;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Runtime configuration for CLI execution.
///
/// Collects the global flags so tests and embedders can drive the CLI without
/// touching process-wide state beyond what [`CliConfig::apply`] does.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` keeps `RUST_LOG` or the `info` default
    pub log_level: Option<String>,

    /// Disable progress bars and spinners
    pub no_progress: bool,

    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the tracing subscriber and the progress switch.
    ///
    /// `RUST_LOG` wins when set. Safe to call more than once; later calls leave
    /// the first subscriber in place.
    pub fn apply(&self) {
        if self.no_progress {
            progress::set_progress_disabled(true);
        }

        let default_level = self.log_level.as_deref().unwrap_or("info");
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("updraft={default_level},warn")));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load settings from the configured file, falling back to the default location.
    pub async fn load_settings(&self) -> Result<UpdateSettings> {
        let config = UpdraftConfig::load_with_optional(self.config_path.clone()).await?;
        Ok(config.settings())
    }
}

/// Self-update from GitHub releases.
#[derive(Parser)]
#[command(
    name = "updraft",
    about = "Update an application from its GitHub releases",
    version,
    author,
    long_about = "updraft checks a GitHub repository for a newer release, downloads and extracts its archive, and starts the installer it contains."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to `RUST_LOG=debug`).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a custom configuration file (default `~/.updraft/config.toml`).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable progress bars and spinners.
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a newer release is available
    Check(check::CheckCommand),

    /// Run the full update: check, download, extract, launch setup
    Run(run::RunCommand),

    /// Download a release archive
    Download(stage::DownloadCommand),

    /// Extract a zip archive
    Extract(stage::ExtractCommand),

    /// Search an extracted release for its installer
    FindInstaller(stage::FindInstallerCommand),

    /// Start an installer
    Launch(stage::LaunchCommand),
}

impl Cli {
    /// Execute the parsed command with configuration derived from the global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            // Progress bars are noise when only errors are wanted
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply();
        let settings = config.load_settings().await?;
        debug!("Using API {} with timeout {:?}", settings.api_base_url, settings.timeout);

        let cancel = cancel_on_ctrl_c();
        match self.command {
            Commands::Check(cmd) => cmd.execute(&settings, &cancel).await,
            Commands::Run(cmd) => cmd.execute(settings, &cancel).await,
            Commands::Download(cmd) => cmd.execute(&settings, &cancel).await,
            Commands::Extract(cmd) => cmd.execute(&settings, &cancel).await,
            Commands::FindInstaller(cmd) => cmd.execute(&settings),
            Commands::Launch(cmd) => cmd.execute(&settings).await,
        }
    }
}

/// A token that fires on Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

/// Turn a failed [`UpdateResult`] into an error for `main` to render.
fn into_outcome<T>(result: UpdateResult<T>) -> Result<UpdateResult<T>> {
    if result.success {
        Ok(result)
    } else {
        Err(ErrorContext::new(result.message, Some(result.kind)).into())
    }
}
