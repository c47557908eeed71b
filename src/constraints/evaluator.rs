//! Evaluation of dependency constraints against installed packages.
//!
//! For each declared constraint the evaluator:
//!
//! 1. Resolves the installed version through a [`PackageMetadataProvider`].
//!    A package that is not installed makes the constraint unsatisfied; its
//!    range is never parsed.
//! 2. Normalizes the constraint into a range and options.
//! 3. Parses the range (malformed ranges are errors) and the installed
//!    version, then tests one against the other.
//!
//! A constraint set is satisfied only if every entry is. Evaluation stops at
//! the first unsatisfied entry, so later packages are never looked up and
//! cannot raise errors.

use std::fmt;

use super::{Constraint, DependencyConstraints, normalize};
use crate::core::{DepsatError, Result};
use crate::metadata::{PackageMetadataProvider, resolve_installed_version};
use crate::version::{VersionRange, parse_version};

/// Result of checking one constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOutcome {
    /// The installed version is inside the range.
    Satisfied {
        /// Installed version string
        installed: String,
    },
    /// No installed metadata for the package.
    NotInstalled,
    /// The installed version is outside the range.
    Unmet {
        /// Installed version string
        installed: String,
        /// Range that was evaluated, after normalization
        range: String,
    },
}

impl ConstraintOutcome {
    /// Whether the constraint holds.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

impl fmt::Display for ConstraintOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfied {
                installed,
            } => write!(f, "installed {installed} satisfies the constraint"),
            Self::NotInstalled => f.write_str("not installed"),
            Self::Unmet {
                installed,
                range,
            } => write!(f, "installed {installed} does not satisfy {range}"),
        }
    }
}

/// Checks constraints against the packages a provider can see.
///
/// # Examples
///
/// ```rust
/// use depsat_cli::constraints::{Constraint, ConstraintEvaluator, DependencyConstraints};
/// use depsat_cli::metadata::InMemoryProvider;
///
/// let provider = InMemoryProvider::new()
///     .with_package("typescript", "5.4.2")
///     .with_package("eslint", "8.57.0");
/// let evaluator = ConstraintEvaluator::new(&provider);
///
/// let mut constraints = DependencyConstraints::new();
/// constraints.insert("typescript".into(), Constraint::at_least("5.0.0"));
/// constraints.insert("eslint".into(), Constraint::range("^9"));
///
/// assert!(!evaluator.satisfies_all(Some(&constraints))?);
/// assert!(evaluator.satisfies_all(None)?);
/// # Ok::<(), depsat_cli::core::DepsatError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintEvaluator<P> {
    provider: P,
}

impl<P: PackageMetadataProvider> ConstraintEvaluator<P> {
    /// Create an evaluator over `provider`.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
        }
    }

    /// The provider lookups go through.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Check a single constraint for `package`.
    pub fn check(&self, package: &str, constraint: &Constraint) -> Result<ConstraintOutcome> {
        let Some(installed) = resolve_installed_version(&self.provider, package)? else {
            return Ok(ConstraintOutcome::NotInstalled);
        };

        let normalized = normalize(constraint);
        let options = normalized.effective_options();

        let range = VersionRange::parse_with(&normalized.range, &options).map_err(|source| {
            DepsatError::MalformedRange {
                package: package.to_string(),
                range: normalized.range.clone(),
                source,
            }
        })?;

        let version = parse_version(&installed, options.loose()).map_err(|source| {
            DepsatError::InvalidInstalledVersion {
                package: package.to_string(),
                version: installed.clone(),
                source,
            }
        })?;

        let outcome = if range.matches(&version, &options) {
            ConstraintOutcome::Satisfied {
                installed,
            }
        } else {
            ConstraintOutcome::Unmet {
                installed,
                range: normalized.range,
            }
        };

        tracing::debug!(
            package = package,
            range = %range,
            include_prerelease = options.include_prerelease(),
            satisfied = outcome.is_satisfied(),
            "Evaluated dependency constraint"
        );

        Ok(outcome)
    }

    /// Find the first unsatisfied constraint, in declaration order.
    ///
    /// Returns `None` when every constraint holds, including when
    /// `constraints` is `None` or empty. Entries after the first failure are
    /// not evaluated.
    pub fn first_unsatisfied(
        &self,
        constraints: Option<&DependencyConstraints>,
    ) -> Result<Option<(String, ConstraintOutcome)>> {
        let Some(constraints) = constraints else {
            return Ok(None);
        };

        for (package, constraint) in constraints {
            let outcome = self.check(package, constraint)?;
            if !outcome.is_satisfied() {
                tracing::debug!(package = %package, outcome = %outcome, "Constraint set not satisfied");
                return Ok(Some((package.clone(), outcome)));
            }
        }

        Ok(None)
    }

    /// Whether every constraint in `constraints` holds.
    pub fn satisfies_all(&self, constraints: Option<&DependencyConstraints>) -> Result<bool> {
        Ok(self.first_unsatisfied(constraints)?.is_none())
    }
}

/// Whether `package` is installed at a version satisfying `constraint`.
pub fn satisfies_dependency_constraint<P>(
    provider: &P,
    package: &str,
    constraint: &Constraint,
) -> Result<bool>
where
    P: PackageMetadataProvider + ?Sized,
{
    Ok(ConstraintEvaluator::new(provider).check(package, constraint)?.is_satisfied())
}

/// Whether every declared constraint is satisfied by the installed packages.
///
/// `None` (nothing declared) and an empty map are both satisfied. Only a
/// missing package turns into `false`; every other failure is returned as an
/// error.
pub fn satisfies_all_dependency_constraints<P>(
    provider: &P,
    constraints: Option<&DependencyConstraints>,
) -> Result<bool>
where
    P: PackageMetadataProvider + ?Sized,
{
    ConstraintEvaluator::new(provider).satisfies_all(constraints)
}
