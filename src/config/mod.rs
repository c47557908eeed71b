//! Project configuration for depsat.
//!
//! A project describes its installed-package environment and, optionally, a
//! default set of constraints in `depsat.toml`. The file is discovered by
//! walking up from the working directory, the same way tools find their
//! project manifest, unless a path is given explicitly.
//!
//! ```toml
//! [environment]
//! provider = "node-modules"   # or "cargo-lock"
//! root = "."                  # search base, relative to this file
//! lockfile = "Cargo.lock"     # cargo-lock provider only
//! cache = true
//!
//! [constraints]
//! typescript = "4.7.0"
//! eslint = { range = ">=8 <10", options = { includePrerelease = false } }
//! ```
//!
//! Every key is optional. An empty file selects the `node-modules` provider
//! rooted at the config file's directory, with caching on and no constraints.
//!
//! # Examples
//!
//! ```rust,no_run
//! use depsat_cli::config::ProjectConfig;
//! use depsat_cli::constraints::satisfies_all_dependency_constraints;
//!
//! # fn example() -> anyhow::Result<()> {
//! let loaded = ProjectConfig::find(std::env::current_dir()?)?.expect("depsat.toml");
//! let provider = loaded.build_provider()?;
//! let ok = satisfies_all_dependency_constraints(&provider, Some(&loaded.config.constraints))?;
//! println!("constraints satisfied: {ok}");
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{CARGO_LOCKFILE, CONFIG_FILE};
use crate::constraints::DependencyConstraints;
use crate::core::DepsatError;
use crate::metadata::{
    CachedProvider, CargoLockProvider, NodeModulesProvider, PackageMetadataProvider,
};

/// Where installed versions are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// `node_modules/<name>/package.json` descriptors.
    #[default]
    NodeModules,
    /// `[[package]]` entries of a `Cargo.lock`.
    CargoLock,
}

/// The `[environment]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Provider to build
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base directory for module resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Lockfile for the `cargo-lock` provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lockfile: Option<PathBuf>,

    /// Wrap the provider in a read-through cache
    #[serde(default = "default_cache")]
    pub cache: bool,
}

const fn default_cache() -> bool {
    true
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            root: None,
            lockfile: None,
            cache: default_cache(),
        }
    }
}

/// Contents of `depsat.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Installed-package environment
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Default constraint set, in declaration order
    #[serde(default)]
    pub constraints: DependencyConstraints,
}

/// A parsed config together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Parsed configuration
    pub config: ProjectConfig,
    /// Path of the config file
    pub path: PathBuf,
}

impl ProjectConfig {
    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            DepsatError::ConfigError {
                message: e.message().to_string(),
            }
            .into()
        })
    }

    /// Load configuration from `path`.
    pub fn load_from(path: &Path) -> Result<LoadedConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            provider = ?config.environment.provider,
            constraints = config.constraints.len(),
            "Loaded project config"
        );

        Ok(LoadedConfig {
            config,
            path: path.to_path_buf(),
        })
    }

    /// Search `start` and its ancestors for `depsat.toml`.
    ///
    /// Returns `Ok(None)` when no ancestor has one.
    pub fn find(start: impl AsRef<Path>) -> Result<Option<LoadedConfig>> {
        for dir in start.as_ref().ancestors() {
            let candidate = dir.join(CONFIG_FILE);
            tracing::trace!(path = %candidate.display(), "Probing for config");
            if candidate.is_file() {
                return Self::load_from(&candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Load an explicit config file, or discover one from `start`.
    ///
    /// An explicit path that does not exist is an error; discovery that
    /// finds nothing is not.
    pub fn load_or_find(explicit: Option<&Path>, start: &Path) -> Result<Option<LoadedConfig>> {
        match explicit {
            Some(path) => Self::load_from(path).map(Some),
            None => Self::find(start),
        }
    }
}

impl LoadedConfig {
    /// Directory containing the config file; relative paths resolve against it.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Resolve `path` against the config directory.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// Node module search base.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        match &self.config.environment.root {
            Some(root) => self.resolve_path(root),
            None => self.base_dir().to_path_buf(),
        }
    }

    /// Lockfile read by the `cargo-lock` provider.
    #[must_use]
    pub fn lockfile(&self) -> PathBuf {
        let lockfile = self
            .config
            .environment
            .lockfile
            .clone()
            .unwrap_or_else(|| PathBuf::from(CARGO_LOCKFILE));
        self.resolve_path(&lockfile)
    }

    /// Build the provider the `[environment]` table describes.
    pub fn build_provider(&self) -> Result<Box<dyn PackageMetadataProvider>> {
        let environment = &self.config.environment;
        let provider: Box<dyn PackageMetadataProvider> = match environment.provider {
            ProviderKind::NodeModules => {
                let provider = NodeModulesProvider::new(self.root());
                wrap(provider, environment.cache)
            }
            ProviderKind::CargoLock => {
                let provider = CargoLockProvider::load(self.lockfile())?;
                wrap(provider, environment.cache)
            }
        };
        Ok(provider)
    }
}

/// Box `provider`, behind a cache when `cache` is set.
pub fn wrap<P>(provider: P, cache: bool) -> Box<dyn PackageMetadataProvider>
where
    P: PackageMetadataProvider + 'static,
{
    if cache {
        Box::new(CachedProvider::new(provider))
    } else {
        Box::new(provider)
    }
}
