//! Error handling for depsat
//!
//! This module provides the error taxonomy for constraint evaluation and the
//! user-facing error rendering used by the CLI. The error system is designed
//! around two core principles:
//! 1. **Strongly-typed errors** so callers can tell a broken install from a
//!    malformed constraint declaration
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Constraint declarations**: [`DepsatError::MalformedRange`], [`DepsatError::InvalidPackageName`]
//! - **Installed metadata**: [`DepsatError::MetadataRead`], [`DepsatError::MetadataParse`],
//!   [`DepsatError::InvalidInstalledVersion`], [`DepsatError::LockfileError`]
//! - **Configuration**: [`DepsatError::ConfigNotFound`], [`DepsatError::ConfigError`]
//!
//! A package that simply is not installed is *not* an error: providers report
//! it as [`PackageLookup::NotFound`] and the evaluator turns it into an
//! unsatisfied constraint.
//!
//! [`PackageLookup::NotFound`]: crate::metadata::PackageLookup::NotFound
//!
//! # Examples
//!
//! ```rust,no_run
//! use depsat_cli::core::{DepsatError, ErrorContext};
//!
//! let context = ErrorContext::new(DepsatError::ConfigNotFound)
//!     .with_suggestion("Create a depsat.toml file or pass --dep name=version")
//!     .with_details("depsat searches the current and parent directories");
//!
//! context.display();
//! ```

use std::fmt;
use std::path::PathBuf;

use colored::Colorize;
use thiserror::Error;

use crate::version::SyntaxError;

/// The main error type for depsat operations.
///
/// Only failures that must stop the caller are represented here. Every
/// variant propagates to the harness so that environment corruption fails
/// loudly instead of silently skipping tests.
#[derive(Error, Debug)]
pub enum DepsatError {
    /// A constraint's range expression does not follow the range grammar.
    ///
    /// This is a defect in the constraint declaration, not an environment
    /// condition.
    #[error("Invalid version range '{range}' declared for package '{package}'")]
    MalformedRange {
        /// Package the constraint was declared for
        package: String,
        /// The range text as declared
        range: String,
        /// Grammar error from the range parser
        #[source]
        source: SyntaxError,
    },

    /// A package descriptor exists but could not be read.
    #[error("Failed to read metadata for package '{package}' at {}", path.display())]
    MetadataRead {
        /// Package being described
        package: String,
        /// Descriptor path that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A package descriptor was read but its contents are unusable.
    #[error("Invalid metadata for package '{package}' in {location}: {reason}")]
    MetadataParse {
        /// Package being described
        package: String,
        /// Where the descriptor came from (file path or provider name)
        location: String,
        /// What was wrong with it
        reason: String,
    },

    /// The installed version string is not a valid semantic version.
    #[error("Package '{package}' reports an invalid installed version '{version}'")]
    InvalidInstalledVersion {
        /// Package whose descriptor carried the version
        package: String,
        /// The version text as found
        version: String,
        /// Grammar error from the version parser
        #[source]
        source: SyntaxError,
    },

    /// A package name that cannot be looked up safely.
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A lockfile used as the metadata source could not be loaded.
    #[error("Failed to load lockfile {}: {reason}", path.display())]
    LockfileError {
        /// Lockfile path
        path: PathBuf,
        /// Read or parse failure description
        reason: String,
    },

    /// Configuration file (depsat.toml) not found
    ///
    /// depsat searches for depsat.toml starting from the current working
    /// directory and walking up the directory tree.
    #[error("Configuration file depsat.toml not found in current directory or any parent directory")]
    ConfigNotFound,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Catch-all for errors without a dedicated variant
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error context wrapper that adds user-friendly suggestions and details.
///
/// Displayed by the CLI with color coding: the error in red, details in
/// yellow and the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying depsat error
    pub error: DepsatError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DepsatError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}
