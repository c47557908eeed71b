//! Version range grammar and evaluation.
//!
//! Ranges use the node-style syntax: `||`-separated comparator sets, each set
//! a whitespace-separated list of comparators that must all hold. Shorthand
//! forms (caret, tilde, hyphen and X-ranges) are desugared at parse time into
//! the primitive operators `<`, `<=`, `>`, `>=` and exact equality, so
//! evaluation is a plain precedence comparison.
//!
//! Desugared bounds use a `-0` prerelease on their synthetic versions
//! (`^1.2.3` becomes `>=1.2.3 <2.0.0-0`), which keeps prereleases of the next
//! major out of the range when prereleases are eligible at all.
//!
//! | Input | Desugared |
//! |-------|-----------|
//! | `^1.2.3` | `>=1.2.3 <2.0.0-0` |
//! | `^0.2.3` | `>=0.2.3 <0.3.0-0` |
//! | `~1.2.3` | `>=1.2.3 <1.3.0-0` |
//! | `1.2` | `>=1.2.0-0 <1.3.0-0` |
//! | `>1.2` | `>=1.3.0-0` |
//! | `1.2.3 - 2.3` | `>=1.2.3 <2.4.0-0` |
//! | `*` | any version |

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};

use super::{MatchOptions, SyntaxError};

static STRICT_PARTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?(?P<major>0|[1-9]\d*|[xX*])(?:\.(?P<minor>0|[1-9]\d*|[xX*])(?:\.(?P<patch>0|[1-9]\d*|[xX*])(?:-(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?)?)?$",
    )
    .expect("strict version pattern is valid")
});

static LOOSE_PARTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[v=\s]*(?P<major>\d+|[xX*])(?:\.(?P<minor>\d+|[xX*])(?:\.(?P<patch>\d+|[xX*])(?:-?(?P<pre>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+(?P<build>[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?)?)?$",
    )
    .expect("loose version pattern is valid")
});

static HYPHEN_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+-\s+(\S+)\s*$").expect("hyphen range pattern is valid")
});

static OPERATOR_GAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(~>|~|\^|>=|<=|>|<|=)\s+").expect("operator gap pattern is valid")
});

static OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(~>|~|\^|>=|<=|>|<|=)?(.*)$").expect("operator pattern is valid")
});

/// Lowest prerelease tag; `X.Y.Z-0` sorts below every other `X.Y.Z` version.
static FLOOR_PRERELEASE: LazyLock<Prerelease> =
    LazyLock::new(|| Prerelease::new("0").expect("`0` is a valid prerelease"));

/// Primitive comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Same precedence (build metadata ignored).
    Exact,
    Greater,
    GreaterEq,
    Less,
    LessEq,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Exact => "",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Less => "<",
            Self::LessEq => "<=",
        };
        f.write_str(symbol)
    }
}

/// A single desugared comparator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparator {
    /// Matches every version.
    Any,
    /// `op version`
    Bound {
        op: Op,
        version: Version,
        /// Produced by desugaring a partial or shorthand bound, not written
        /// by the user. Synthetic bounds never admit prereleases on their own.
        synthetic: bool,
    },
}

impl Comparator {
    fn bound(op: Op, version: Version) -> Self {
        Self::Bound {
            op,
            version,
            synthetic: false,
        }
    }

    fn synthetic(op: Op, version: Version) -> Self {
        Self::Bound {
            op,
            version,
            synthetic: true,
        }
    }

    /// Test `version` against this comparator by precedence.
    #[must_use]
    pub fn test(&self, version: &Version) -> bool {
        let Self::Bound { op, version: bound, .. } = self else {
            return true;
        };

        let ordering = cmp_precedence(version, bound);
        match op {
            Op::Exact => ordering == Ordering::Equal,
            Op::Greater => ordering == Ordering::Greater,
            Op::GreaterEq => ordering != Ordering::Less,
            Op::Less => ordering == Ordering::Less,
            Op::LessEq => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Bound { op, version, .. } => write!(f, "{op}{version}"),
        }
    }
}

/// A parsed version range: a disjunction of comparator sets.
///
/// # Examples
///
/// ```rust
/// use depsat_cli::version::{MatchOptions, VersionRange};
/// use semver::Version;
///
/// let range = VersionRange::parse("^1.2.0 || >=3")?;
/// let options = MatchOptions::default();
///
/// assert!(range.matches(&Version::parse("1.9.0")?, &options));
/// assert!(!range.matches(&Version::parse("2.0.0")?, &options));
/// assert!(range.matches(&Version::parse("3.1.4")?, &options));
/// assert_eq!(range.to_string(), ">=1.2.0 <2.0.0-0 || >=3.0.0-0");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    sets: Vec<Vec<Comparator>>,
}

impl VersionRange {
    /// Parse a range with strict version syntax.
    pub fn parse(range: &str) -> Result<Self, SyntaxError> {
        Self::parse_with(range, &MatchOptions::default())
    }

    /// Parse a range, honoring the `loose` flag of `options`.
    pub fn parse_with(range: &str, options: &MatchOptions) -> Result<Self, SyntaxError> {
        let loose = options.loose();
        let sets = range
            .split("||")
            .map(|set| parse_set(set, loose))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| SyntaxError::Range {
                input: range.to_string(),
                reason,
            })?;

        Ok(Self {
            raw: range.to_string(),
            sets,
        })
    }

    /// The range text as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Desugared comparator sets, in declaration order.
    #[must_use]
    pub fn comparator_sets(&self) -> &[Vec<Comparator>] {
        &self.sets
    }

    /// Whether `version` falls inside this range.
    ///
    /// A prerelease `version` is treated according to
    /// [`MatchOptions::include_prerelease`]:
    ///
    /// - `Some(true)`: compared by precedence like any other version
    /// - `Some(false)`: never matches
    /// - `None`: matches only through a set that also names a prerelease on
    ///   the same `major.minor.patch` in one of its own comparators
    #[must_use]
    pub fn matches(&self, version: &Version, options: &MatchOptions) -> bool {
        if version.pre.is_empty() {
            return self.sets.iter().any(|set| set_matches(set, version));
        }

        match options.include_prerelease {
            Some(true) => self.sets.iter().any(|set| set_matches(set, version)),
            Some(false) => false,
            None => self
                .sets
                .iter()
                .any(|set| set_matches(set, version) && admits_prerelease(set, version)),
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, set) in self.sets.iter().enumerate() {
            if index > 0 {
                f.write_str(" || ")?;
            }
            if set.is_empty() {
                f.write_str("*")?;
                continue;
            }
            for (position, comparator) in set.iter().enumerate() {
                if position > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{comparator}")?;
            }
        }
        Ok(())
    }
}

fn set_matches(set: &[Comparator], version: &Version) -> bool {
    set.iter().all(|comparator| comparator.test(version))
}

/// Whether a user-written comparator in `set` carries a prerelease on the
/// same tuple as `version`.
fn admits_prerelease(set: &[Comparator], version: &Version) -> bool {
    set.iter().any(|comparator| match comparator {
        Comparator::Bound { version: bound, synthetic: false, .. } => {
            !bound.pre.is_empty()
                && (bound.major, bound.minor, bound.patch)
                    == (version.major, version.minor, version.patch)
        }
        _ => false,
    })
}

/// Parse a complete `major.minor.patch` version as found in package metadata.
///
/// A leading `v` is accepted; `loose` additionally accepts leading `=`,
/// leading zeros and prerelease tags without the `-` separator.
pub fn parse_version(input: &str, loose: bool) -> Result<Version, SyntaxError> {
    let error = |reason: String| SyntaxError::Version {
        input: input.to_string(),
        reason,
    };

    let partial = parse_partial(input.trim(), loose).map_err(error)?;
    partial.into_version().ok_or_else(|| error("expected a full major.minor.patch version".into()))
}

/// Compare two versions by semver precedence, ignoring build metadata.
#[must_use]
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch).cmp(&(b.major, b.minor, b.patch)).then_with(|| a.pre.cmp(&b.pre))
}

/// A possibly-partial version; `None` components are wildcards.
#[derive(Debug)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
    build: BuildMetadata,
}

impl Partial {
    fn into_version(self) -> Option<Version> {
        Some(Version {
            major: self.major?,
            minor: self.minor?,
            patch: self.patch?,
            pre: self.pre,
            build: self.build,
        })
    }

    fn full(&self) -> Option<Version> {
        Some(Version {
            major: self.major?,
            minor: self.minor?,
            patch: self.patch?,
            pre: self.pre.clone(),
            build: self.build.clone(),
        })
    }
}

fn parse_partial(token: &str, loose: bool) -> Result<Partial, String> {
    let pattern = if loose {
        &*LOOSE_PARTIAL
    } else {
        &*STRICT_PARTIAL
    };

    let caps =
        pattern.captures(token).ok_or_else(|| format!("'{token}' is not a valid version"))?;

    let component = |name: &str| -> Result<Option<u64>, String> {
        match caps.name(name).map(|m| m.as_str()) {
            None | Some("x" | "X" | "*") => Ok(None),
            Some(digits) => digits
                .parse::<u64>()
                .map(Some)
                .map_err(|_| format!("version component '{digits}' is too large")),
        }
    };

    let major = component("major")?;
    let minor = major.and(component("minor")?);
    let patch = minor.and(component("patch")?);

    let pre = match caps.name("pre") {
        Some(m) => Prerelease::new(m.as_str()).map_err(|e| e.to_string())?,
        None => Prerelease::EMPTY,
    };
    let build = match caps.name("build") {
        Some(m) => BuildMetadata::new(m.as_str()).map_err(|e| e.to_string())?,
        None => BuildMetadata::EMPTY,
    };

    if patch.is_none() && (!pre.is_empty() || !build.is_empty()) {
        return Err(format!("'{token}' puts a prerelease or build tag on a wildcard"));
    }

    Ok(Partial {
        major,
        minor,
        patch,
        pre,
        build,
    })
}

fn parse_set(set: &str, loose: bool) -> Result<Vec<Comparator>, String> {
    let set = set.trim();
    if set.is_empty() {
        return Ok(vec![Comparator::Any]);
    }

    if let Some(caps) = HYPHEN_RANGE.captures(set) {
        let from = parse_partial(&caps[1], loose)?;
        let to = parse_partial(&caps[2], loose)?;
        let mut comparators = hyphen(&from, &to)?;
        prune_any(&mut comparators);
        return Ok(comparators);
    }

    let glued = OPERATOR_GAP.replace_all(set, "$1");
    let mut comparators = Vec::new();
    for token in glued.split_whitespace() {
        let caps = OPERATOR.captures(token).ok_or_else(|| format!("cannot read '{token}'"))?;
        let op = caps.get(1).map_or("", |m| m.as_str());
        let rest = caps.get(2).map_or("", |m| m.as_str());
        if rest.is_empty() {
            return Err(format!("operator '{op}' is missing a version"));
        }

        let partial = parse_partial(rest, loose)?;
        comparators.extend(desugar(op, &partial)?);
    }

    prune_any(&mut comparators);
    Ok(comparators)
}

/// `*` is redundant next to any other comparator.
fn prune_any(comparators: &mut Vec<Comparator>) {
    if comparators.len() > 1 {
        comparators.retain(|c| !matches!(c, Comparator::Any));
    }
}

fn desugar(op: &str, partial: &Partial) -> Result<Vec<Comparator>, String> {
    match op {
        "^" => caret(partial),
        "~" | "~>" => tilde(partial),
        "" | "=" => x_range(partial),
        ">" => primitive(Op::Greater, partial),
        ">=" => primitive(Op::GreaterEq, partial),
        "<" => primitive(Op::Less, partial),
        "<=" => primitive(Op::LessEq, partial),
        other => Err(format!("unknown operator '{other}'")),
    }
}

fn caret(p: &Partial) -> Result<Vec<Comparator>, String> {
    let Some(major) = p.major else {
        return Ok(vec![Comparator::Any]);
    };
    let Some(minor) = p.minor else {
        return Ok(vec![
            Comparator::synthetic(Op::GreaterEq, floor(major, 0, 0)),
            Comparator::synthetic(Op::Less, floor(bump(major)?, 0, 0)),
        ]);
    };
    let Some(lower) = p.full() else {
        let upper = if major == 0 {
            floor(0, bump(minor)?, 0)
        } else {
            floor(bump(major)?, 0, 0)
        };
        return Ok(vec![
            Comparator::synthetic(Op::GreaterEq, floor(major, minor, 0)),
            Comparator::synthetic(Op::Less, upper),
        ]);
    };

    let upper = if major != 0 {
        floor(bump(major)?, 0, 0)
    } else if minor != 0 {
        floor(0, bump(minor)?, 0)
    } else {
        floor(0, 0, bump(lower.patch)?)
    };
    Ok(vec![Comparator::bound(Op::GreaterEq, lower), Comparator::synthetic(Op::Less, upper)])
}

fn tilde(p: &Partial) -> Result<Vec<Comparator>, String> {
    let Some(major) = p.major else {
        return Ok(vec![Comparator::Any]);
    };
    let Some(minor) = p.minor else {
        return Ok(vec![
            Comparator::synthetic(Op::GreaterEq, floor(major, 0, 0)),
            Comparator::synthetic(Op::Less, floor(bump(major)?, 0, 0)),
        ]);
    };
    let lower = match p.full() {
        Some(version) => Comparator::bound(Op::GreaterEq, version),
        None => Comparator::synthetic(Op::GreaterEq, floor(major, minor, 0)),
    };
    Ok(vec![
        lower,
        Comparator::synthetic(Op::Less, floor(major, bump(minor)?, 0)),
    ])
}

fn x_range(p: &Partial) -> Result<Vec<Comparator>, String> {
    if let Some(version) = p.full() {
        return Ok(vec![Comparator::bound(Op::Exact, version)]);
    }
    // Without a full version, a bare or `=` partial spans its wildcard components.
    tilde(p)
}

fn primitive(op: Op, p: &Partial) -> Result<Vec<Comparator>, String> {
    if let Some(version) = p.full() {
        return Ok(vec![Comparator::bound(op, version)]);
    }

    let Some(major) = p.major else {
        return Ok(match op {
            // Nothing is above or below every version.
            Op::Greater | Op::Less => vec![Comparator::synthetic(Op::Less, floor(0, 0, 0))],
            _ => vec![Comparator::Any],
        });
    };

    let comparator = match (op, p.minor) {
        (Op::Greater, None) => Comparator::synthetic(Op::GreaterEq, floor(bump(major)?, 0, 0)),
        (Op::Greater, Some(minor)) => {
            Comparator::synthetic(Op::GreaterEq, floor(major, bump(minor)?, 0))
        }
        (Op::LessEq, None) => Comparator::synthetic(Op::Less, floor(bump(major)?, 0, 0)),
        (Op::LessEq, Some(minor)) => Comparator::synthetic(Op::Less, floor(major, bump(minor)?, 0)),
        (Op::GreaterEq, minor) => {
            Comparator::synthetic(Op::GreaterEq, floor(major, minor.unwrap_or(0), 0))
        }
        (Op::Less, minor) => Comparator::synthetic(Op::Less, floor(major, minor.unwrap_or(0), 0)),
        (Op::Exact, _) => return x_range(p),
    };
    Ok(vec![comparator])
}

fn hyphen(from: &Partial, to: &Partial) -> Result<Vec<Comparator>, String> {
    let lower = match (from.major, from.full()) {
        (None, _) => Comparator::Any,
        (Some(_), Some(version)) => Comparator::bound(Op::GreaterEq, version),
        (Some(major), None) => {
            Comparator::synthetic(Op::GreaterEq, floor(major, from.minor.unwrap_or(0), 0))
        }
    };

    let upper = match (to.major, to.minor, to.full()) {
        (None, _, _) => Comparator::Any,
        (Some(major), None, _) => Comparator::synthetic(Op::Less, floor(bump(major)?, 0, 0)),
        (Some(major), Some(minor), None) => {
            Comparator::synthetic(Op::Less, floor(major, bump(minor)?, 0))
        }
        (Some(_), Some(_), Some(version)) => Comparator::bound(Op::LessEq, version),
    };

    Ok(vec![lower, upper])
}

fn floor(major: u64, minor: u64, patch: u64) -> Version {
    Version {
        major,
        minor,
        patch,
        pre: FLOOR_PRERELEASE.clone(),
        build: BuildMetadata::EMPTY,
    }
}

fn bump(component: u64) -> Result<u64, String> {
    component.checked_add(1).ok_or_else(|| format!("version component {component} overflows"))
}
