//! Dependency constraint declarations and their normalization.
//!
//! A test case declares the package versions it needs as a map from package
//! name to [`Constraint`]. Each constraint is written either as a bare
//! minimum version or as an explicit range with optional matching options:
//!
//! ```toml
//! [constraints]
//! typescript = "4.7.0"                      # shorthand: >=4.7.0
//! eslint = { range = "^8.0.0 || ^9.0.0" }   # structured
//! vitest = { range = ">=1.0.0-beta", options = { includePrerelease = false } }
//! ```
//!
//! [`normalize`] turns either form into a [`NormalizedConstraint`]: a range
//! string plus the options the matcher should use.
//!
//! # Option Handling
//!
//! | Form | Normalized options |
//! |------|--------------------|
//! | Shorthand | `None` (matcher defaults; prereleases need a same-tuple comparator) |
//! | Structured, no options | [`BASE_MATCH_OPTIONS`] |
//! | Structured with options | options merged over [`BASE_MATCH_OPTIONS`] |

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::version::{BASE_MATCH_OPTIONS, MatchOptions};

pub mod evaluator;

pub use evaluator::{
    ConstraintEvaluator, ConstraintOutcome, satisfies_all_dependency_constraints,
    satisfies_dependency_constraint,
};

/// Package name to constraint, evaluated in declaration order.
pub type DependencyConstraints = IndexMap<String, Constraint>;

/// An explicit range with optional matching options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemverVersionConstraint {
    /// Range expression in the semver range grammar
    pub range: String,
    /// Options merged over the base defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<MatchOptions>,
}

/// A per-package version requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    /// Bare minimum version, equivalent to `>=version`.
    Shorthand(String),
    /// Explicit range and options.
    Structured(SemverVersionConstraint),
}

impl Constraint {
    /// Shorthand constraint requiring at least `version`.
    pub fn at_least(version: impl Into<String>) -> Self {
        Self::Shorthand(version.into())
    }

    /// Structured constraint with base options.
    pub fn range(range: impl Into<String>) -> Self {
        Self::Structured(SemverVersionConstraint {
            range: range.into(),
            options: None,
        })
    }

    /// Structured constraint with explicit options.
    pub fn range_with(range: impl Into<String>, options: MatchOptions) -> Self {
        Self::Structured(SemverVersionConstraint {
            range: range.into(),
            options: Some(options),
        })
    }
}

impl From<&str> for Constraint {
    fn from(version: &str) -> Self {
        Self::at_least(version)
    }
}

impl From<SemverVersionConstraint> for Constraint {
    fn from(constraint: SemverVersionConstraint) -> Self {
        Self::Structured(constraint)
    }
}

/// Canonical form of a [`Constraint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedConstraint {
    /// Range expression to evaluate
    pub range: String,
    /// Options to evaluate with; `None` means matcher defaults
    pub options: Option<MatchOptions>,
}

impl NormalizedConstraint {
    /// Options the matcher should actually apply.
    #[must_use]
    pub fn effective_options(&self) -> MatchOptions {
        self.options.unwrap_or_default()
    }
}

/// Convert a constraint into its canonical range and options.
///
/// # Examples
///
/// ```rust
/// use depsat_cli::constraints::{Constraint, normalize};
/// use depsat_cli::version::BASE_MATCH_OPTIONS;
///
/// let shorthand = normalize(&Constraint::at_least("1.2.0"));
/// assert_eq!(shorthand.range, ">=1.2.0");
/// assert_eq!(shorthand.options, None);
///
/// let structured = normalize(&Constraint::range("^2.0.0"));
/// assert_eq!(structured.range, "^2.0.0");
/// assert_eq!(structured.options, Some(BASE_MATCH_OPTIONS));
/// ```
#[must_use]
pub fn normalize(constraint: &Constraint) -> NormalizedConstraint {
    match constraint {
        Constraint::Shorthand(version) => NormalizedConstraint {
            range: format!(">={version}"),
            options: None,
        },
        Constraint::Structured(structured) => NormalizedConstraint {
            range: structured.range.clone(),
            options: Some(MatchOptions::merge(&BASE_MATCH_OPTIONS, structured.options.as_ref())),
        },
    }
}
