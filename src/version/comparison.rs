//! Helpers for comparing release tags.
//!
//! Release lists from GitHub contain tags that do not parse (`nightly`, `latest`).
//! These helpers skip them instead of failing the whole comparison.
//!
//! # Examples
//!
//! ```rust,no_run
//! use updraft::version::VersionTag;
//! use updraft::version::comparison::VersionComparator;
//!
//! let tags = vec!["v1.0.0".to_string(), "nightly".to_string(), "v2.0.0-beta".to_string()];
//!
//! let latest = VersionComparator::latest(&tags, true).expect("a tag parses");
//! assert_eq!(latest.to_string(), "v2.0.0-beta");
//!
//! let stable = VersionComparator::latest(&tags, false).expect("a stable tag parses");
//! assert_eq!(stable, VersionTag::new(1, 0, 0));
//! ```

use super::VersionTag;

/// Stateless comparison helpers over [`VersionTag`].
pub struct VersionComparator;

impl VersionComparator {
    /// `true` when `candidate` is strictly newer than `current`.
    ///
    /// When `current` is unknown every candidate counts as newer.
    #[must_use]
    pub fn is_update(current: Option<&VersionTag>, candidate: &VersionTag) -> bool {
        current.is_none_or(|current| candidate > current)
    }

    /// Highest parseable tag in `tags`.
    ///
    /// Pre-release tags are only considered when `include_prereleases` is set.
    /// Returns `None` when nothing qualifies.
    #[must_use]
    pub fn latest<S: AsRef<str>>(tags: &[S], include_prereleases: bool) -> Option<VersionTag> {
        tags.iter()
            .filter_map(|t| VersionTag::parse(t.as_ref()).ok())
            .filter(|t| include_prereleases || !t.qualifier.is_prerelease())
            .max()
    }
}
