//! Updraft CLI entry point
//!
//! Parses the command line, sets up logging, and runs one update stage or a full
//! update:
//! - `check` - compare the latest release with an installed version
//! - `run` - full pipeline: check, download, extract, launch setup
//! - `download` - download an archive
//! - `extract` - extract a zip archive
//! - `find-installer` - search an extracted tree for the installer
//! - `launch` - start an installer

use anyhow::Result;
use clap::Parser;
use updraft::cli;
use updraft::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
