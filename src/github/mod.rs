//! Release metadata from GitHub.
//!
//! The update pipeline only needs three facts about a release: its tag, where the
//! archive lives, and whether it is a pre-release. [`ReleaseSource`] is the seam the
//! pipeline talks to; [`GithubClient`] is the REST implementation.
//!
//! # Endpoints
//!
//! - `GET {api}/repos/{owner}/{repo}/releases/latest`
//! - `GET {api}/repos/{owner}/{repo}/releases/tags/{tag}`
//! - `GET {api}/repos/{owner}/{repo}/releases`
//!
//! # Examples
//!
//! ```rust,no_run
//! use updraft::config::UpdateSettings;
//! use updraft::github::{GithubClient, ReleaseSource, Repository};
//!
//! # async fn example() -> Result<(), updraft::core::UpdraftError> {
//! let client = GithubClient::from_settings(&UpdateSettings::default())?;
//! let repo = Repository::parse("octocat/hello-world")?;
//!
//! let release = client.latest_release(&repo).await?;
//! println!("{} -> {:?}", release.tag_name, release.archive_url(None));
//! # Ok(())
//! # }
//! ```

mod client;
mod models;

pub use client::{GithubClient, GithubClientBuilder};
pub use models::{ReleaseAsset, ReleaseInfo, Repository};

use crate::core::UpdraftError;
use async_trait::async_trait;

/// Source of release metadata.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// The release GitHub considers latest (never a draft or pre-release).
    async fn latest_release(&self, repo: &Repository) -> Result<ReleaseInfo, UpdraftError>;

    /// The release published for `tag`.
    async fn release_by_tag(&self, repo: &Repository, tag: &str)
    -> Result<ReleaseInfo, UpdraftError>;

    /// Published releases, newest first as GitHub orders them.
    async fn releases(&self, repo: &Repository) -> Result<Vec<ReleaseInfo>, UpdraftError>;

    /// The release with the highest tag, pre-releases included.
    ///
    /// Drafts and releases whose tag does not parse are ignored.
    async fn latest_release_including_prereleases(
        &self,
        repo: &Repository,
    ) -> Result<ReleaseInfo, UpdraftError> {
        self.releases(repo)
            .await?
            .into_iter()
            .filter(|r| !r.draft)
            .filter_map(|r| r.version_tag().ok().map(|tag| (tag, r)))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, release)| release)
            .ok_or_else(|| UpdraftError::MalformedResponse {
                url: format!("releases of {repo}"),
                reason: "no release with a version tag".to_string(),
            })
    }
}
