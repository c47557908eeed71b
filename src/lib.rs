//! depsat - dependency constraint satisfaction
//!
//! Decides whether the packages installed in an environment satisfy a set of
//! declared version constraints. Test harnesses use it to skip cases whose
//! requirements are not met by the installed toolchain.
//!
//! # Architecture Overview
//!
//! A check runs in three steps for every declared constraint, in declaration
//! order, and stops at the first failure:
//!
//! 1. **Resolve** the installed version through a metadata provider. A package
//!    that is not installed fails the constraint.
//! 2. **Normalize** the constraint. A bare version `"1.2.0"` means `>=1.2.0`;
//!    a structured `{ range, options }` is used as given, with its options
//!    merged over base defaults that let prereleases match.
//! 3. **Match** the installed version against the range.
//!
//! # Core Modules
//!
//! - [`version`] - Range grammar, matching options and the `satisfies` predicate
//! - [`metadata`] - Installed package lookup (`node_modules`, `Cargo.lock`, in-memory)
//! - [`constraints`] - Constraint declarations, normalization and evaluation
//! - [`config`] - Project configuration (`depsat.toml`)
//! - [`cli`] - Command-line interface
//! - [`core`] - Error types and user-facing error formatting
//! - [`constants`] - Shared file and directory names
//!
//! # Example
//!
//! ```rust
//! use depsat_cli::constraints::{
//!     Constraint, DependencyConstraints, satisfies_all_dependency_constraints,
//! };
//! use depsat_cli::metadata::InMemoryProvider;
//!
//! let provider = InMemoryProvider::new().with_package("typescript", "5.4.2");
//!
//! let mut constraints = DependencyConstraints::new();
//! constraints.insert("typescript".into(), Constraint::at_least("4.7.0"));
//!
//! assert!(satisfies_all_dependency_constraints(&provider, Some(&constraints))?);
//! # Ok::<(), depsat_cli::core::DepsatError>(())
//! ```
//!
//! # Configuration (depsat.toml)
//!
//! ```toml
//! [environment]
//! provider = "node-modules"
//!
//! [constraints]
//! typescript = "4.7.0"
//! eslint = { range = ">=8 <10", options = { includePrerelease = false } }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod constraints;
pub mod core;
pub mod metadata;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use constraints::{
    Constraint, DependencyConstraints, satisfies_all_dependency_constraints,
    satisfies_dependency_constraint,
};
pub use core::{DepsatError, Result};
