//! Configuration for updraft.
//!
//! Settings come from a TOML file with environment overrides on top. The file is
//! optional; a missing file means defaults everywhere.
//!
//! # File Location
//!
//! - **Windows**: `%LOCALAPPDATA%\updraft\config.toml`
//! - **Unix/macOS**: `~/.updraft/config.toml`
//! - Overridden by `UPDRAFT_CONFIG_PATH` or the CLI `--config` flag
//!
//! # Environment Overrides
//!
//! - `UPDRAFT_GITHUB_TOKEN`: GitHub token, wins over `github_token` in the file
//!
//! # Example File
//!
//! ```toml
//! api_base_url = "https://api.github.com"
//! timeout_secs = 60
//! github_token = "ghp_xxxxxxxxxxxx"
//! installer_tokens = ["setup", "exe"]
//! require_elevation = false
//! overwrite = true
//! preferred_asset = "win-x64"
//!
//! [installer_rule]
//! token = "setup"
//! case_sensitive = false
//! mode = "contains"
//! ```

use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_MATCH_TOKENS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    GITHUB_API_BASE_URL, GITHUB_TOKEN_ENV,
};
use crate::paths::InstallerNameRule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdraftConfig {
    /// Base URL of the GitHub REST API; point it at GitHub Enterprise or a mock server
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Token sent as `Authorization: Bearer`; raises rate limits and unlocks private repositories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// Tokens an installer file name must all contain
    #[serde(default = "default_installer_tokens")]
    pub installer_tokens: Vec<String>,

    /// Naming rule a located installer must also satisfy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_rule: Option<InstallerNameRule>,

    /// Ask the OS to run the installer elevated
    #[serde(default)]
    pub require_elevation: bool,

    /// Replace existing files during extraction
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,

    /// Preferred release asset name fragment, e.g. `win-x64`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_asset: Option<String>,
}

fn default_api_base_url() -> String {
    GITHUB_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_installer_tokens() -> Vec<String> {
    DEFAULT_MATCH_TOKENS.iter().map(ToString::to_string).collect()
}

fn default_overwrite() -> bool {
    true
}

impl Default for UpdraftConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            github_token: None,
            installer_tokens: default_installer_tokens(),
            installer_rule: None,
            require_elevation: false,
            overwrite: default_overwrite(),
            preferred_asset: None,
        }
    }
}

impl UpdraftConfig {
    /// Load from the default location, falling back to defaults when the file is absent.
    ///
    /// Environment overrides are applied afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            Self::load_from(&path).await?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a specific file. No environment overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Default config file location.
    ///
    /// `UPDRAFT_CONFIG_PATH` wins when set.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
            && !path.trim().is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("updraft")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".updraft")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Apply environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(GITHUB_TOKEN_ENV)
            && !token.trim().is_empty()
        {
            debug!("Using GitHub token from {GITHUB_TOKEN_ENV}");
            self.github_token = Some(token);
        }
    }

    /// Runtime settings derived from this configuration.
    #[must_use]
    pub fn settings(&self) -> UpdateSettings {
        UpdateSettings {
            api_base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            user_agent: self.user_agent.clone(),
            github_token: self.github_token.clone(),
            installer_tokens: self.installer_tokens.clone(),
            installer_rule: self.installer_rule.clone(),
            require_elevation: self.require_elevation,
            overwrite: self.overwrite,
            preferred_asset: self.preferred_asset.clone(),
        }
    }
}

/// Runtime settings shared by the HTTP client, downloader, extractor, locator and
/// launcher of one update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSettings {
    /// Base URL of the GitHub REST API
    pub api_base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Optional bearer token
    pub github_token: Option<String>,
    /// Tokens an installer file name must all contain
    pub installer_tokens: Vec<String>,
    /// Extra naming rule for the located installer
    pub installer_rule: Option<InstallerNameRule>,
    /// Launch the installer elevated
    pub require_elevation: bool,
    /// Replace existing files during extraction
    pub overwrite: bool,
    /// Preferred release asset name fragment
    pub preferred_asset: Option<String>,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        UpdraftConfig::default().settings()
    }
}
