//! Version range parsing and matching.
//!
//! This module answers one question: does a version string fall inside a
//! range expression? Ranges follow the node-style semantic-versioning grammar
//! (comparator sets, caret/tilde shorthand, hyphen ranges, X-ranges and `||`
//! alternatives). Versions are represented with [`semver::Version`].
//!
//! # Module Organization
//!
//! - [`range`] - Range grammar, desugaring and evaluation
//! - [`options`] - Matching options and the base defaults they merge over
//!
//! # Prerelease Handling
//!
//! Whether a prerelease version (`1.0.0-alpha.1`) can satisfy a range depends
//! on [`MatchOptions::include_prerelease`]:
//!
//! | Flag | Prerelease versions |
//! |------|---------------------|
//! | `Some(true)` | compared like any other version |
//! | `None` | only through a comparator that names a prerelease of the same `major.minor.patch` |
//! | `Some(false)` | never match |
//!
//! The [`BASE_MATCH_OPTIONS`] that structured constraints merge over turn the
//! flag on.
//!
//! # Examples
//!
//! ```rust
//! use depsat_cli::version::{BASE_MATCH_OPTIONS, satisfies};
//!
//! assert!(satisfies("1.5.0", ">=1.2.0", None)?);
//! assert!(!satisfies("3.0.0", "^2.0.0", None)?);
//!
//! // By default a prerelease only matches a range that names its tuple.
//! assert!(satisfies("1.0.0-alpha.1", ">=1.0.0-alpha", None)?);
//! assert!(!satisfies("1.1.0-alpha", ">=1.0.0-alpha", None)?);
//! assert!(satisfies("1.1.0-alpha", ">=1.0.0-alpha", Some(&BASE_MATCH_OPTIONS))?);
//! # Ok::<(), depsat_cli::version::SyntaxError>(())
//! ```

use thiserror::Error;

pub mod options;
pub mod range;

pub use options::{BASE_MATCH_OPTIONS, MatchOptions};
pub use range::{Comparator, Op, VersionRange, parse_version};

/// Syntax errors from the version and range grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A version string that is not a complete semantic version.
    #[error("invalid version '{input}': {reason}")]
    Version {
        /// The rejected version text
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// A range expression that does not follow the range grammar.
    #[error("invalid version range '{input}': {reason}")]
    Range {
        /// The rejected range text
        input: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Test whether `version` satisfies `range`.
///
/// `options` of `None` means the matcher defaults ([`MatchOptions::default`]),
/// under which a prerelease only matches a range naming its tuple. The range is parsed before the version, so a
/// malformed range is reported even when the version is also invalid.
pub fn satisfies(
    version: &str,
    range: &str,
    options: Option<&MatchOptions>,
) -> Result<bool, SyntaxError> {
    let options = options.copied().unwrap_or_default();
    let range = VersionRange::parse_with(range, &options)?;
    let version = parse_version(version, options.loose())?;
    Ok(range.matches(&version, &options))
}
