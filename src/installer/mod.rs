//! Locating and starting the release installer.
//!
//! - [`InstallerLocator`] / [`find_installer`]: deterministic search of an extracted tree
//! - [`InstallerLauncher`] / [`ProcessLauncher`]: detached process start, optionally elevated

mod launcher;
mod locator;

pub use launcher::{InstallerLauncher, ProcessLauncher};
pub use locator::{InstallerLocator, find_installer};
