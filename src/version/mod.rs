//! Release version tags and their ordering.
//!
//! GitHub release tags are loosely formatted: `v3.1.5`, `3.1`, `v4.0.0-beta`,
//! `2.0 Preview`. This module parses them into a [`VersionTag`] with a total order
//! that decides whether an update is worth installing.
//!
//! # Module Organization
//!
//! - [`VersionTag`] and [`Qualifier`] - the value types
//! - [`comparison`] - helpers that pick the newest tag from a list
//!
//! # Parsing Rules
//!
//! 1. Surrounding whitespace and one leading `v`/`V` are stripped
//! 2. The first qualifier name found anywhere in the text (`preview`, `beta`, `alpha`,
//!    `full`, case-insensitive) is removed together with one adjacent separator
//! 3. The rest is split on `.` and up to three unsigned integers are read left to right;
//!    reading stops at the first component that is not a number and the missing
//!    components default to `0`
//! 4. A tag with no leading numeric component is rejected
//!
//! # Ordering
//!
//! Tags compare by `(major, minor, patch)` first. The qualifier only breaks a full
//! numeric tie, with `Full > Preview > Beta > Alpha`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use updraft::version::{Qualifier, VersionTag};
//!
//! # fn example() -> Result<(), updraft::core::UpdraftError> {
//! let installed: VersionTag = "v3.1.5".parse()?;
//! let published = VersionTag::parse("3.2")?;
//! assert!(published > installed);
//!
//! let beta = VersionTag::parse("v1.0.0-beta")?;
//! assert_eq!(beta.qualifier, Qualifier::Beta);
//! assert!(beta < VersionTag::new(1, 0, 0));
//! # Ok(())
//! # }
//! ```

pub mod comparison;

pub use comparison::VersionComparator;

use crate::core::UpdraftError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Release maturity marker.
///
/// The discriminant grows as a release gets less final, so ordering is the reverse of
/// the encoding: `Full` is the greatest qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Qualifier {
    /// A final release.
    #[default]
    Full = 0,
    /// A release candidate or preview build.
    Preview = 1,
    /// A beta build.
    Beta = 2,
    /// An alpha build.
    Alpha = 3,
}

impl Qualifier {
    /// Qualifiers in the order the parser looks for them.
    const ALL: [Self; 4] = [Self::Preview, Self::Beta, Self::Alpha, Self::Full];

    /// Lowercase name as it appears in tags.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Preview => "preview",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
        }
    }

    /// `true` for anything but [`Qualifier::Full`].
    #[must_use]
    pub const fn is_prerelease(self) -> bool {
        !matches!(self, Self::Full)
    }

    const fn encoding(self) -> u8 {
        self as u8
    }
}

impl Ord for Qualifier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smaller encoding means a more final release
        other.encoding().cmp(&self.encoding())
    }
}

impl PartialOrd for Qualifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed release version.
///
/// Equality requires all four fields to match. Values are immutable; use
/// [`VersionTag::with_qualifier`] to get a copy with another qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionTag {
    /// Major component
    pub major: u32,
    /// Minor component
    pub minor: u32,
    /// Patch component
    pub patch: u32,
    /// Maturity marker
    pub qualifier: Qualifier,
}

impl VersionTag {
    /// The smallest tag the parser can produce, `v0.0.0-alpha`.
    pub const MIN: Self = Self {
        major: 0,
        minor: 0,
        patch: 0,
        qualifier: Qualifier::Alpha,
    };

    /// Build a final release tag from its numeric components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            qualifier: Qualifier::Full,
        }
    }

    /// Return a copy carrying `qualifier` instead of the parsed one.
    ///
    /// Used when GitHub flags a release as a pre-release but the tag string does not
    /// say so.
    #[must_use]
    pub const fn with_qualifier(self, qualifier: Qualifier) -> Self {
        Self {
            qualifier,
            ..self
        }
    }

    /// Parse a release tag.
    ///
    /// # Errors
    ///
    /// Returns [`UpdraftError::InvalidVersion`] when the text has no leading numeric
    /// component, e.g. `""`, `"v"` or `"latest"`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use updraft::version::VersionTag;
    ///
    /// # fn example() -> Result<(), updraft::core::UpdraftError> {
    /// assert_eq!(VersionTag::parse("v1")?, VersionTag::new(1, 0, 0));
    /// assert_eq!(VersionTag::parse("1.0.0")?, VersionTag::parse("v1.0.0")?);
    /// assert!(VersionTag::parse("v").is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse(text: &str) -> Result<Self, UpdraftError> {
        let invalid = |reason: &str| UpdraftError::InvalidVersion {
            input: text.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = text.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let (numbers, qualifier) = split_qualifier(body);

        let mut components = [0u32; 3];
        let mut parsed = 0;
        for (slot, part) in components.iter_mut().zip(numbers.split('.')) {
            match part.trim().parse::<u32>() {
                Ok(value) => {
                    *slot = value;
                    parsed += 1;
                }
                Err(_) => break,
            }
        }

        if parsed == 0 {
            return Err(invalid("no numeric version component"));
        }

        Ok(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
            qualifier,
        })
    }
}

/// Separators that may sit next to a qualifier name.
fn is_separator(c: char) -> bool {
    matches!(c, '-' | '.' | '_' | ' ' | '+')
}

/// Remove the first qualifier name found in `body` together with one adjacent separator.
///
/// After a version number, a pre-release counter (`beta2`, `preview.1`) goes with the
/// name so its digits cannot join the patch number.
fn split_qualifier(body: &str) -> (String, Qualifier) {
    let lowered = body.to_ascii_lowercase();

    let found = Qualifier::ALL
        .iter()
        .filter_map(|q| lowered.find(q.name()).map(|pos| (pos, *q)))
        .min_by_key(|(pos, _)| *pos);

    let Some((start, qualifier)) = found else {
        return (body.to_string(), Qualifier::Full);
    };

    let mut begin = start;
    let mut end = start + qualifier.name().len();

    if !body[..start].trim_end_matches(is_separator).is_empty() {
        let rest = &body[end..];
        let counter = rest.strip_prefix(is_separator).unwrap_or(rest);
        let digits = counter.len() - counter.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 {
            end += rest.len() - counter.len() + digits;
        }
    }

    // ASCII lowercasing keeps byte offsets aligned with `body`
    if body[..begin].ends_with(is_separator) {
        begin -= 1;
    } else if body[end..].starts_with(is_separator) {
        end += 1;
    }

    let mut numbers = String::with_capacity(body.len());
    numbers.push_str(&body[..begin]);
    numbers.push_str(&body[end..]);
    (numbers, qualifier)
}

impl Ord for VersionTag {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for VersionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for VersionTag {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.qualifier.is_prerelease() {
            write!(f, "-{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for VersionTag {
    type Err = UpdraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for VersionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
