//! Filesystem provider for node-style package installs.
//!
//! Lookup follows node module resolution: starting at the base directory,
//! check `<dir>/node_modules/<name>/package.json`, then repeat for every
//! parent directory up to the filesystem root. The first descriptor found
//! wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{PackageDescriptor, PackageLookup, PackageMetadataProvider, validate_package_name};
use crate::constants::{MODULES_DIR, PACKAGE_DESCRIPTOR};
use crate::core::{DepsatError, Result};

/// The fields of `package.json` that matter here.
#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// Reads package descriptors from `node_modules` directories.
#[derive(Debug, Clone)]
pub struct NodeModulesProvider {
    base: PathBuf,
}

impl NodeModulesProvider {
    /// Create a provider that resolves packages relative to `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
        }
    }

    /// The directory lookups start from.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Candidate descriptor paths for `package`, nearest first.
    pub fn candidate_paths<'a>(&'a self, package: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.base
            .ancestors()
            .map(move |dir| dir.join(MODULES_DIR).join(package).join(PACKAGE_DESCRIPTOR))
    }

    fn read_descriptor(package: &str, path: &Path, content: &str) -> Result<PackageDescriptor> {
        let parse_error = |reason: String| DepsatError::MetadataParse {
            package: package.to_string(),
            location: path.display().to_string(),
            reason,
        };

        let manifest: PackageJson =
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;

        let version =
            manifest.version.ok_or_else(|| parse_error("missing \"version\" field".to_string()))?;

        if let Some(declared) = manifest.name.as_deref().filter(|declared| *declared != package) {
            tracing::warn!(
                package = package,
                declared = declared,
                path = %path.display(),
                "Descriptor declares a different package name"
            );
        }

        Ok(PackageDescriptor {
            name: package.to_string(),
            version,
            location: Some(path.to_path_buf()),
        })
    }
}

impl PackageMetadataProvider for NodeModulesProvider {
    fn describe(&self, package: &str) -> Result<PackageLookup> {
        validate_package_name(package)?;

        for path in self.candidate_paths(package) {
            tracing::trace!(package = package, path = %path.display(), "Probing descriptor");

            match fs::read_to_string(&path) {
                Ok(content) => {
                    return Self::read_descriptor(package, &path, &content)
                        .map(PackageLookup::Found);
                }
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {}
                Err(source) => {
                    return Err(DepsatError::MetadataRead {
                        package: package.to_string(),
                        path,
                        source,
                    });
                }
            }
        }

        Ok(PackageLookup::NotFound)
    }
}
