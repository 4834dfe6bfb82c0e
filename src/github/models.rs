//! GitHub release data types.

use crate::core::UpdraftError;
use crate::version::{Qualifier, VersionTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner and name of a GitHub repository.
///
/// Both parts are validated on construction: non-empty, at most 100 characters, and
/// only ASCII letters, digits, `-`, `_` and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    /// Validate owner and repository name.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidRepository`] when either part is empty or
    /// contains characters GitHub does not allow.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, UpdraftError> {
        let owner = owner.into();
        let name = name.into();
        validate_part(&owner, "owner")?;
        validate_part(&name, "repository name")?;
        Ok(Self {
            owner,
            name,
        })
    }

    /// Parse an `owner/name` slug.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidRepository`] when the slug has no `/` or either
    /// part is invalid.
    pub fn parse(slug: &str) -> Result<Self, UpdraftError> {
        let Some((owner, name)) = slug.trim().split_once('/') else {
            return Err(UpdraftError::InvalidRepository {
                value: slug.to_string(),
                reason: "expected 'owner/name'".to_string(),
            });
        };
        Self::new(owner, name)
    }

    /// Repository owner
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_part(value: &str, what: &str) -> Result<(), UpdraftError> {
    let reject = |reason: String| UpdraftError::InvalidRepository {
        value: value.to_string(),
        reason,
    };

    if value.trim().is_empty() {
        return Err(reject(format!("{what} is empty")));
    }
    if value.len() > 100 {
        return Err(reject(format!("{what} is longer than 100 characters")));
    }
    if let Some(c) = value.chars().find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))) {
        return Err(reject(format!("{what} contains {c:?}")));
    }
    Ok(())
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// File name as shown on the release page
    pub name: String,
    /// Direct download URL
    pub browser_download_url: String,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// MIME type reported by GitHub
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Release metadata returned by the GitHub releases API.
///
/// Only the fields updraft uses are decoded; everything else in the response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// The git tag, e.g. `v3.1.5`
    pub tag_name: String,
    /// Human-readable release title
    #[serde(default)]
    pub name: Option<String>,
    /// Release page URL
    #[serde(default)]
    pub html_url: Option<String>,
    /// Source snapshot archive
    #[serde(default)]
    pub zipball_url: Option<String>,
    /// Whether GitHub marks the release as a pre-release
    #[serde(default)]
    pub prerelease: bool,
    /// Whether the release is an unpublished draft
    #[serde(default)]
    pub draft: bool,
    /// Publication timestamp
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Attached files
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseInfo {
    /// Parse the tag into a [`VersionTag`].
    ///
    /// When GitHub flags the release as a pre-release but the tag carries no qualifier,
    /// the result is marked [`Qualifier::Preview`].
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidVersion`] when the tag has no numeric component.
    pub fn version_tag(&self) -> Result<VersionTag, UpdraftError> {
        let tag = VersionTag::parse(&self.tag_name)?;
        if self.prerelease && tag.qualifier == Qualifier::Full {
            return Ok(tag.with_qualifier(Qualifier::Preview));
        }
        Ok(tag)
    }

    /// URL of the archive to download.
    ///
    /// Picks a `.zip` asset whose name contains `preferred`, then any `.zip` asset,
    /// then the source `zipball_url`.
    #[must_use]
    pub fn archive_url(&self, preferred: Option<&str>) -> Option<&str> {
        let zips: Vec<&ReleaseAsset> =
            self.assets.iter().filter(|a| a.name.to_ascii_lowercase().ends_with(".zip")).collect();

        let preferred_match = preferred.and_then(|p| {
            let p = p.to_ascii_lowercase();
            zips.iter().find(|a| a.name.to_ascii_lowercase().contains(&p))
        });

        preferred_match
            .or_else(|| zips.first())
            .map(|a| a.browser_download_url.as_str())
            .or(self.zipball_url.as_deref())
    }
}
