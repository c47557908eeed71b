//! Metadata provider backed by a `Cargo.lock`.
//!
//! Every `[[package]]` entry in the lockfile counts as installed. When a name
//! is locked at several versions (common for transitive dependencies) the
//! highest version is reported.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{PackageDescriptor, PackageLookup, PackageMetadataProvider};
use crate::core::{DepsatError, Result};
use crate::version::range::cmp_precedence;

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
}

/// Reads installed versions from a parsed `Cargo.lock`.
#[derive(Debug, Clone)]
pub struct CargoLockProvider {
    path: PathBuf,
    versions: HashMap<String, String>,
}

impl CargoLockProvider {
    /// Load and parse the lockfile at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DepsatError::LockfileError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Parse lockfile `content`; `path` is only used for reporting.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let lockfile: Lockfile = toml::from_str(content).map_err(|e| DepsatError::LockfileError {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let mut versions: HashMap<String, String> = HashMap::new();
        for locked in lockfile.package {
            let replace = versions
                .get(&locked.name)
                .is_none_or(|current| is_newer(&locked.version, current));
            if replace {
                versions.insert(locked.name, locked.version);
            }
        }

        tracing::debug!(
            path = %path.display(),
            packages = versions.len(),
            "Loaded lockfile"
        );

        Ok(Self {
            path,
            versions,
        })
    }

    /// Lockfile the provider was built from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether `candidate` outranks `current`; unparseable versions never win.
fn is_newer(candidate: &str, current: &str) -> bool {
    match (semver::Version::parse(candidate), semver::Version::parse(current)) {
        (Ok(candidate), Ok(current)) => cmp_precedence(&candidate, &current).is_gt(),
        (Ok(_), Err(_)) => true,
        _ => false,
    }
}

impl PackageMetadataProvider for CargoLockProvider {
    fn describe(&self, package: &str) -> Result<PackageLookup> {
        Ok(match self.versions.get(package) {
            Some(version) => PackageLookup::Found(PackageDescriptor {
                name: package.to_string(),
                version: version.clone(),
                location: Some(self.path.clone()),
            }),
            None => PackageLookup::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCKFILE: &str = r#"
version = 4

[[package]]
name = "serde"
version = "1.0.210"
source = "registry+https://github.com/rust-lang/crates.io-index"

[[package]]
name = "syn"
version = "1.0.109"

[[package]]
name = "syn"
version = "2.0.77"

[[package]]
name = "syn"
version = "1.0.50"

[[package]]
name = "my-app"
version = "0.1.0"
dependencies = ["serde", "syn 2.0.77"]
"#;

    #[test]
    fn test_reports_locked_versions() {
        let provider = CargoLockProvider::parse("Cargo.lock", LOCKFILE).unwrap();
        let lookup = provider.describe("serde").unwrap();
        let descriptor = lookup.descriptor().unwrap();
        assert_eq!(descriptor.version, "1.0.210");
        assert_eq!(descriptor.location.as_deref(), Some(Path::new("Cargo.lock")));
    }

    #[test]
    fn test_highest_duplicate_wins() {
        let provider = CargoLockProvider::parse("Cargo.lock", LOCKFILE).unwrap();
        assert_eq!(provider.describe("syn").unwrap().descriptor().unwrap().version, "2.0.77");
    }

    #[test]
    fn test_unlocked_package_not_found() {
        let provider = CargoLockProvider::parse("Cargo.lock", LOCKFILE).unwrap();
        assert_eq!(provider.describe("tokio").unwrap(), PackageLookup::NotFound);
    }

    #[test]
    fn test_invalid_toml_is_lockfile_error() {
        let err = CargoLockProvider::parse("Cargo.lock", "[[package]\nname = ").unwrap_err();
        assert!(matches!(err, DepsatError::LockfileError { .. }));
    }

    #[test]
    fn test_missing_file_is_lockfile_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = CargoLockProvider::load(temp.path().join("Cargo.lock")).unwrap_err();
        assert!(matches!(err, DepsatError::LockfileError { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("Cargo.lock");
        std::fs::write(&path, LOCKFILE).unwrap();

        let provider = CargoLockProvider::load(&path).unwrap();
        assert_eq!(provider.path(), path);
        assert!(provider.describe("my-app").unwrap().descriptor().is_some());
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer("2.0.0", "1.9.9"));
        assert!(!is_newer("1.0.0", "1.0.0"));
        assert!(is_newer("1.0.0", "garbage"));
        assert!(!is_newer("garbage", "1.0.0"));
    }
}
