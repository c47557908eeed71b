//! Core types and error handling for depsat
//!
//! This module holds the pieces shared by every other module: the
//! [`DepsatError`] taxonomy, the [`ErrorContext`] wrapper the CLI renders, and
//! [`user_friendly_error`], which maps any `anyhow::Error` onto a context with
//! suggestions.
//!
//! # Error Propagation
//!
//! Library operations return `Result<T, DepsatError>` so callers can match on
//! the failure kind. The CLI and configuration loader work in `anyhow::Result`
//! and add context with `.with_context(..)`; [`user_friendly_error`] walks the
//! chain to recover the typed error for display.

pub mod error;
pub mod error_formatting;

pub use error::{DepsatError, ErrorContext};
pub use error_formatting::user_friendly_error;

/// Result type for library operations.
pub type Result<T, E = DepsatError> = std::result::Result<T, E>;
