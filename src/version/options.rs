//! Matching options for version range evaluation.
//!
//! Options are stored as optional fields so an override record can say
//! "leave this as-is" for any flag it does not mention. The effective value of
//! an unset flag is always `false`.

use serde::{Deserialize, Serialize};

/// Options applied when testing a version against a [`VersionRange`].
///
/// Unknown fields are ignored when deserializing, so declarations written for
/// other matchers still load.
///
/// # Examples
///
/// ```rust
/// use depsat_cli::version::{BASE_MATCH_OPTIONS, MatchOptions};
///
/// let overrides = MatchOptions {
///     include_prerelease: Some(false),
///     ..MatchOptions::default()
/// };
///
/// let merged = MatchOptions::merge(&BASE_MATCH_OPTIONS, Some(&overrides));
/// assert!(!merged.include_prerelease());
///
/// let untouched = MatchOptions::merge(&BASE_MATCH_OPTIONS, None);
/// assert_eq!(untouched, BASE_MATCH_OPTIONS);
/// ```
///
/// [`VersionRange`]: super::VersionRange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Treat prerelease-tagged versions as eligible for matching.
    #[serde(
        default,
        alias = "includePrerelease",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_prerelease: Option<bool>,

    /// Accept sloppier version syntax (leading zeros, prerelease tags without `-`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loose: Option<bool>,
}

/// Base options that structured constraints are merged over.
pub const BASE_MATCH_OPTIONS: MatchOptions = MatchOptions {
    include_prerelease: Some(true),
    loose: None,
};

impl MatchOptions {
    /// Overlay `overrides` on top of `base`, field by field.
    ///
    /// Fields left unset in `overrides` keep the value from `base`. Passing
    /// `None` returns `base` unchanged.
    #[must_use]
    pub fn merge(base: &Self, overrides: Option<&Self>) -> Self {
        let Some(overrides) = overrides else {
            return *base;
        };

        Self {
            include_prerelease: overrides.include_prerelease.or(base.include_prerelease),
            loose: overrides.loose.or(base.loose),
        }
    }

    /// Effective prerelease flag.
    #[must_use]
    pub fn include_prerelease(&self) -> bool {
        self.include_prerelease.unwrap_or(false)
    }

    /// Effective loose-parsing flag.
    #[must_use]
    pub fn loose(&self) -> bool {
        self.loose.unwrap_or(false)
    }
}
