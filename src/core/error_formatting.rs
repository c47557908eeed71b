//! Error formatting utilities for depsat
//!
//! Converts internal errors into clear, actionable messages for CLI users.

use super::error::{DepsatError, ErrorContext};

/// Convert any error into a user-friendly format with contextual suggestions
///
/// Walks the error chain looking for a [`DepsatError`]; errors wrapped by
/// `anyhow` context are still recognized. Anything else falls back to a
/// generic context carrying the top-level message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut current_error: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(depsat_error) = current_error.downcast_ref::<DepsatError>() {
            let context = create_error_context(depsat_error);
            // Keep the outermost message when context was layered on top.
            return if error.to_string() == depsat_error.to_string() {
                context
            } else {
                context.with_details(format!("{error:#}"))
            };
        }

        match current_error.source() {
            Some(source) => current_error = source,
            None => break,
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return ErrorContext::new(DepsatError::Other {
            message: io_error.to_string(),
        })
        .with_suggestion("Check file permissions and that the path exists");
    }

    ErrorContext::new(DepsatError::Other {
        message: format!("{error:#}"),
    })
}

/// Build an [`ErrorContext`] with suggestions for a specific [`DepsatError`].
fn create_error_context(error: &DepsatError) -> ErrorContext {
    match error {
        DepsatError::MalformedRange {
            package,
            range,
            source,
        } => ErrorContext::new(DepsatError::MalformedRange {
            package: package.clone(),
            range: range.clone(),
            source: source.clone(),
        })
        .with_details(source.to_string())
        .with_suggestion(
            "Use semver range syntax such as '>=1.2.0', '^2.0.0', '~1.4', '1.x || >=3' or '1.2.3 - 2.0.0'",
        ),
        DepsatError::MetadataRead {
            package,
            path,
            source,
        } => ErrorContext::new(DepsatError::Other {
            message: format!("Failed to read metadata for package '{package}' at {}", path.display()),
        })
        .with_details(source.to_string())
        .with_suggestion("Check file permissions on the installed package, or reinstall it"),
        DepsatError::MetadataParse {
            package,
            location,
            reason,
        } => ErrorContext::new(DepsatError::MetadataParse {
            package: package.clone(),
            location: location.clone(),
            reason: reason.clone(),
        })
        .with_suggestion(format!(
            "The installation of '{package}' looks corrupt; reinstall it to restore its metadata"
        )),
        DepsatError::InvalidInstalledVersion {
            package,
            version,
            source,
        } => ErrorContext::new(DepsatError::InvalidInstalledVersion {
            package: package.clone(),
            version: version.clone(),
            source: source.clone(),
        })
        .with_details(source.to_string())
        .with_suggestion(format!("Reinstall '{package}'; its metadata should carry a semantic version")),
        DepsatError::InvalidPackageName {
            name,
            reason,
        } => ErrorContext::new(DepsatError::InvalidPackageName {
            name: name.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Package names look like 'name' or '@scope/name'"),
        DepsatError::LockfileError {
            path,
            reason,
        } => ErrorContext::new(DepsatError::LockfileError {
            path: path.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Point 'environment.lockfile' in depsat.toml at a valid Cargo.lock"),
        DepsatError::ConfigNotFound => ErrorContext::new(DepsatError::ConfigNotFound)
            .with_suggestion("Create a depsat.toml, pass --config, or declare constraints with --dep/--range")
            .with_details("depsat searches the current directory and its parents for depsat.toml"),
        DepsatError::ConfigError {
            message,
        } => ErrorContext::new(DepsatError::ConfigError {
            message: message.clone(),
        })
        .with_suggestion("Check depsat.toml for syntax errors and unsupported values"),
        DepsatError::Other {
            message,
        } => ErrorContext::new(DepsatError::Other {
            message: message.clone(),
        }),
    }
}
