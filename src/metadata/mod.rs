//! Installed package metadata lookup.
//!
//! A [`PackageMetadataProvider`] answers one question for a package name:
//! what version is installed, if any? The answer is a typed
//! [`PackageLookup`] so that "not installed" stays distinct from a failure to
//! read metadata that does exist.
//!
//! # Providers
//!
//! - [`NodeModulesProvider`] - reads `node_modules/<name>/package.json`, walking
//!   up the ancestor directories the way node module resolution does
//! - [`CargoLockProvider`] - reads `[[package]]` entries from a `Cargo.lock`
//! - [`InMemoryProvider`] - a fake for tests, with injectable failures
//! - [`CachedProvider`] - wraps any provider with a per-process read-through cache
//!
//! # Examples
//!
//! ```rust
//! use depsat_cli::metadata::{InMemoryProvider, resolve_installed_version};
//!
//! let provider = InMemoryProvider::new().with_package("typescript", "5.4.2");
//!
//! assert_eq!(
//!     resolve_installed_version(&provider, "typescript")?,
//!     Some("5.4.2".to_string())
//! );
//! assert_eq!(resolve_installed_version(&provider, "eslint")?, None);
//! # Ok::<(), depsat_cli::core::DepsatError>(())
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{DepsatError, Result};

pub mod cache;
pub mod cargo_lock;
pub mod memory;
pub mod node_modules;

pub use cache::CachedProvider;
pub use cargo_lock::CargoLockProvider;
pub use memory::InMemoryProvider;
pub use node_modules::NodeModulesProvider;

/// Metadata read from an installed package's descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// Package name as requested
    pub name: String,
    /// Declared version string, unparsed
    pub version: String,
    /// Where the descriptor was found, when it came from disk
    pub location: Option<PathBuf>,
}

/// Outcome of describing a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageLookup {
    /// The package is installed.
    Found(PackageDescriptor),
    /// No descriptor exists for the package.
    NotFound,
}

impl PackageLookup {
    /// The descriptor, if the package was found.
    #[must_use]
    pub fn descriptor(&self) -> Option<&PackageDescriptor> {
        match self {
            Self::Found(descriptor) => Some(descriptor),
            Self::NotFound => None,
        }
    }
}

/// Source of installed package metadata.
///
/// Implementations return [`PackageLookup::NotFound`] when a package is simply
/// not installed and an error for anything else (unreadable or unparseable
/// descriptors, invalid names).
pub trait PackageMetadataProvider {
    /// Describe the installed package named `package`.
    fn describe(&self, package: &str) -> Result<PackageLookup>;
}

impl<P: PackageMetadataProvider + ?Sized> PackageMetadataProvider for &P {
    fn describe(&self, package: &str) -> Result<PackageLookup> {
        (**self).describe(package)
    }
}

impl<P: PackageMetadataProvider + ?Sized> PackageMetadataProvider for Box<P> {
    fn describe(&self, package: &str) -> Result<PackageLookup> {
        (**self).describe(package)
    }
}

impl<P: PackageMetadataProvider + ?Sized> PackageMetadataProvider for Arc<P> {
    fn describe(&self, package: &str) -> Result<PackageLookup> {
        (**self).describe(package)
    }
}

/// Resolve the installed version of `package`.
///
/// Returns `Ok(None)` when the package is not installed. Provider failures
/// propagate unchanged.
pub fn resolve_installed_version<P>(provider: &P, package: &str) -> Result<Option<String>>
where
    P: PackageMetadataProvider + ?Sized,
{
    match provider.describe(package)? {
        PackageLookup::Found(descriptor) => {
            tracing::debug!(
                package = package,
                version = %descriptor.version,
                location = ?descriptor.location,
                "Resolved installed package"
            );
            Ok(Some(descriptor.version))
        }
        PackageLookup::NotFound => {
            tracing::debug!(package = package, "Package is not installed");
            Ok(None)
        }
    }
}

/// Check that `name` is a plain or `@scope/name` package name.
///
/// Names are joined onto filesystem paths by some providers, so anything that
/// could escape the modules directory is rejected before lookup.
pub fn validate_package_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(DepsatError::InvalidPackageName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name != name.trim() {
        return invalid("name has leading or trailing whitespace");
    }
    if name.contains('\\') {
        return invalid("name contains a backslash");
    }
    if name.starts_with('/') {
        return invalid("name is an absolute path");
    }

    let segments: Vec<&str> = name.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty() || *segment == "." || *segment == "..") {
        return invalid("name contains an empty or relative path segment");
    }

    match segments.as_slice() {
        [_] if name.starts_with('@') => invalid("scoped name is missing the package part"),
        [_] => Ok(()),
        [scope, _] if scope.starts_with('@') && scope.len() > 1 => Ok(()),
        [_, _] => invalid("only scoped names ('@scope/name') may contain '/'"),
        _ => invalid("name has too many '/' separators"),
    }
}
