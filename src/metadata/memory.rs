//! In-memory metadata provider for tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{PackageDescriptor, PackageLookup, PackageMetadataProvider};
use crate::constants::MEMORY_LOCATION;
use crate::core::{DepsatError, Result};

#[derive(Debug, Clone)]
enum Entry {
    Installed(String),
    Broken(String),
}

/// Provider backed by a `HashMap`, useful for tests.
///
/// Every `describe` call is recorded so tests can assert which packages were
/// looked up, and in what order.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    packages: HashMap<String, Entry>,
    lookups: Mutex<Vec<String>>,
}

impl InMemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an installed package.
    #[must_use]
    pub fn with_package(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.packages.insert(name.into(), Entry::Installed(version.into()));
        self
    }

    /// Add a package whose metadata fails to load with `reason`.
    #[must_use]
    pub fn with_failure(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.packages.insert(name.into(), Entry::Broken(reason.into()));
        self
    }

    /// Package names passed to `describe`, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl PackageMetadataProvider for InMemoryProvider {
    fn describe(&self, package: &str) -> Result<PackageLookup> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).push(package.to_string());

        match self.packages.get(package) {
            Some(Entry::Installed(version)) => Ok(PackageLookup::Found(PackageDescriptor {
                name: package.to_string(),
                version: version.clone(),
                location: None,
            })),
            Some(Entry::Broken(reason)) => Err(DepsatError::MetadataParse {
                package: package.to_string(),
                location: MEMORY_LOCATION.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(PackageLookup::NotFound),
        }
    }
}
