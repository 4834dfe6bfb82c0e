//! Starting the located installer.
//!
//! The installer is started detached: updraft does not wait for it and passes no
//! arguments. No shell is involved for a normal launch. An elevated launch on Windows
//! goes through `Start-Process -Verb RunAs`, which shows the UAC prompt.

use crate::core::UpdraftError;
use crate::paths::{InstallerPath, ValidatedPath};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Something that can start an installer.
#[async_trait]
pub trait InstallerLauncher: Send + Sync {
    /// Start `exe` without waiting for it to finish.
    async fn launch(&self, exe: &InstallerPath, require_elevation: bool) -> Result<(), UpdraftError>;
}

/// Launches installers as OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    fn command(exe: &InstallerPath, require_elevation: bool) -> Result<Command, UpdraftError> {
        if !require_elevation {
            return Ok(Command::new(exe.as_path()));
        }

        if cfg!(windows) {
            let quoted = exe.to_string().replace('\'', "''");
            let mut command = Command::new("powershell");
            command.args([
                "-NoProfile",
                "-NonInteractive",
                "-Command",
                &format!("Start-Process -FilePath '{quoted}' -Verb RunAs"),
            ]);
            Ok(command)
        } else {
            Err(UpdraftError::UnsupportedPlatform {
                operation: "elevated installer launch".to_string(),
            })
        }
    }
}

#[async_trait]
impl InstallerLauncher for ProcessLauncher {
    async fn launch(&self, exe: &InstallerPath, require_elevation: bool) -> Result<(), UpdraftError> {
        if !exe.path_exists() {
            return Err(UpdraftError::FileNotFound {
                path: exe.to_string(),
            });
        }

        let mut command = Self::command(exe, require_elevation)?;
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null()).kill_on_drop(false);

        let child = command.spawn().map_err(|e| UpdraftError::LaunchFailed {
            path: exe.to_string(),
            reason: e.to_string(),
        })?;

        info!(
            "Started installer {exe}{} (pid {:?})",
            if require_elevation { " elevated" } else { "" },
            child.id()
        );
        // Dropping the handle leaves the process running
        drop(child);
        Ok(())
    }
}
