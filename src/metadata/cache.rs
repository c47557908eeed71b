//! Read-through cache over a metadata provider.
//!
//! Installed versions do not change while a harness runs, so a lookup result
//! is kept for the lifetime of the wrapper. Errors are never cached; a failed
//! lookup is retried on the next call.

use dashmap::DashMap;

use super::{PackageLookup, PackageMetadataProvider};
use crate::core::Result;

/// Caches `describe` results of the wrapped provider.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    entries: DashMap<String, PackageLookup>,
}

impl<P: PackageMetadataProvider> CachedProvider<P> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached lookups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: PackageMetadataProvider> PackageMetadataProvider for CachedProvider<P> {
    fn describe(&self, package: &str) -> Result<PackageLookup> {
        if let Some(hit) = self.entries.get(package) {
            tracing::trace!(package = package, "Metadata cache hit");
            return Ok(hit.value().clone());
        }

        let lookup = self.inner.describe(package)?;
        self.entries.insert(package.to_string(), lookup.clone());
        Ok(lookup)
    }
}
