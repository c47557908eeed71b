//! Evaluate dependency constraints against the installed packages.
//!
//! Constraints come from `--dep` / `--range` flags when any are given, and
//! from the `[constraints]` table of `depsat.toml` otherwise.
//!
//! ```bash
//! depsat check --dep typescript=4.7.0
//! depsat check --range 'eslint=^8 || ^9' --exclude-prerelease
//! depsat check --json
//! ```
//!
//! JSON output:
//!
//! ```json
//! {
//!   "satisfied": false,
//!   "checked": 2,
//!   "failure": {
//!     "package": "eslint",
//!     "reason": "unmet",
//!     "installed": "8.57.0",
//!     "range": "^9"
//!   }
//! }
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::CliConfig;
use crate::constraints::{Constraint, ConstraintEvaluator, ConstraintOutcome, DependencyConstraints};
use crate::core::DepsatError;
use crate::version::MatchOptions;

/// Command to check a constraint set.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Require at least VERSION of NAME
    #[arg(long = "dep", value_name = "NAME=VERSION", value_parser = parse_assignment)]
    pub deps: Vec<(String, String)>,

    /// Require NAME to satisfy RANGE
    #[arg(long = "range", value_name = "NAME=RANGE", value_parser = parse_assignment)]
    pub ranges: Vec<(String, String)>,

    /// Do not let prerelease versions satisfy `--range` constraints
    #[arg(long)]
    pub exclude_prerelease: bool,

    /// Resolve node modules from DIR
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print a JSON report
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable result of `depsat check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Whether every constraint holds
    pub satisfied: bool,
    /// Constraints evaluated before stopping
    pub checked: usize,
    /// The first unsatisfied constraint
    pub failure: Option<FailureReport>,
}

/// The constraint that stopped evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// Package name
    pub package: String,
    /// `not-installed` or `unmet`
    pub reason: &'static str,
    /// Installed version, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed: Option<String>,
    /// Range the installed version missed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl FailureReport {
    /// Describe a failed constraint; `None` when the outcome is satisfied.
    fn from_outcome(package: String, outcome: ConstraintOutcome) -> Option<Self> {
        match outcome {
            ConstraintOutcome::Satisfied { .. } => None,
            ConstraintOutcome::Unmet {
                installed,
                range,
            } => Some(Self {
                package,
                reason: "unmet",
                installed: Some(installed),
                range: Some(range),
            }),
            ConstraintOutcome::NotInstalled => Some(Self {
                package,
                reason: "not-installed",
                installed: None,
                range: None,
            }),
        }
    }
}

impl CheckCommand {
    /// Evaluate the constraints; `Ok(false)` when one is not satisfied.
    pub fn execute(self, config: &CliConfig) -> Result<bool> {
        let report = self.run(config)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        Ok(report.satisfied)
    }

    /// Evaluate the constraints and build a report without printing it.
    pub fn run(&self, config: &CliConfig) -> Result<CheckReport> {
        let loaded = config.load_config()?;

        let constraints = if self.has_inline_constraints() {
            self.inline_constraints()
        } else {
            match &loaded {
                Some(loaded) => loaded.config.constraints.clone(),
                None => return Err(DepsatError::ConfigNotFound.into()),
            }
        };

        let provider = config.provider(self.root.as_deref(), loaded.as_ref())?;
        let evaluator = ConstraintEvaluator::new(provider);
        let failure = evaluator.first_unsatisfied(Some(&constraints))?;

        let checked = failure
            .as_ref()
            .and_then(|(package, _)| constraints.get_index_of(package))
            .map_or(constraints.len(), |index| index + 1);

        let failure = failure.and_then(|(package, outcome)| FailureReport::from_outcome(package, outcome));

        Ok(CheckReport {
            satisfied: failure.is_none(),
            checked,
            failure,
        })
    }

    fn has_inline_constraints(&self) -> bool {
        !self.deps.is_empty() || !self.ranges.is_empty()
    }

    /// `--dep` entries first, then `--range` entries, each in argument order.
    fn inline_constraints(&self) -> DependencyConstraints {
        let range_options = MatchOptions {
            include_prerelease: self.exclude_prerelease.then_some(false),
            loose: None,
        };

        let deps =
            self.deps.iter().map(|(name, version)| (name.clone(), Constraint::at_least(version.as_str())));
        let ranges = self.ranges.iter().map(|(name, range)| {
            (name.clone(), Constraint::range_with(range.as_str(), range_options))
        });

        deps.chain(ranges).collect()
    }
}

fn print_report(report: &CheckReport) {
    match &report.failure {
        None => {
            println!(
                "{} {} dependency constraint(s) satisfied",
                "✓".green(),
                report.checked
            );
        }
        Some(failure) => {
            let detail = match (&failure.installed, &failure.range) {
                (Some(installed), Some(range)) => {
                    format!("installed {installed} does not satisfy {range}")
                }
                _ => "not installed".to_string(),
            };
            println!("{} {}: {}", "✗".red(), failure.package.bold(), detail);
        }
    }
}

/// Parse a `NAME=VALUE` argument; the name ends at the first `=`.
fn parse_assignment(input: &str) -> Result<(String, String), String> {
    let (name, value) =
        input.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got '{input}'"))?;
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() {
        return Err(format!("missing package name in '{input}'"));
    }
    if value.is_empty() {
        return Err(format!("missing version in '{input}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
