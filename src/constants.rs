//! Global constants used throughout updraft.
//!
//! This module contains timeout durations, default file names, and the
//! GitHub API coordinates used across multiple modules.

use std::time::Duration;

/// Default base URL of the GitHub REST API.
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Media type requested from the GitHub REST API.
pub const GITHUB_ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP request timeout (30 seconds).
///
/// Applies to each metadata request and to the whole archive download.
pub fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

/// User agent sent with every request. GitHub rejects requests without one.
pub const DEFAULT_USER_AGENT: &str = concat!("updraft/", env!("CARGO_PKG_VERSION"));

/// File name appended when a zip path is given as a folder.
pub const DEFAULT_ZIP_FILE_NAME: &str = "update.zip";

/// File name appended when an installer path is given as a folder.
pub const DEFAULT_INSTALLER_FILE_NAME: &str = "setup.exe";

/// File name appended when a generic file path is given as a folder.
pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "download.bin";

/// Substring an installer file name must contain by default.
pub const DEFAULT_INSTALLER_TOKEN: &str = "setup";

/// Tokens the installer locator requires in a file name by default.
pub const DEFAULT_MATCH_TOKENS: [&str; 2] = ["setup", "exe"];

/// Longest path string accepted by the validated path types.
///
/// Matches the classic Windows `MAX_PATH` on Windows and `PATH_MAX` elsewhere.
#[cfg(windows)]
pub const MAX_PATH_LEN: usize = 260;

/// Longest path string accepted by the validated path types.
#[cfg(not(windows))]
pub const MAX_PATH_LEN: usize = 4096;

/// Environment variable that disables progress bars when set.
pub const NO_PROGRESS_ENV: &str = "UPDRAFT_NO_PROGRESS";

/// Environment variable holding a GitHub token. Wins over the config file.
pub const GITHUB_TOKEN_ENV: &str = "UPDRAFT_GITHUB_TOKEN";

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "UPDRAFT_CONFIG_PATH";
