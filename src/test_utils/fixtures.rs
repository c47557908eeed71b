//! Test fixtures for installed-package environments and config files.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{CONFIG_FILE, MODULES_DIR, PACKAGE_DESCRIPTOR};

/// A temporary project directory with a `node_modules` tree.
///
/// The directory is removed when the fixture is dropped.
#[derive(Debug)]
pub struct NodeModulesFixture {
    temp: TempDir,
}

impl NodeModulesFixture {
    /// Create an empty project directory.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self {
            temp,
        })
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Install `name` at `version` under the project root.
    pub fn install(&self, name: &str, version: &str) -> Result<PathBuf> {
        self.install_at(self.root(), name, version)
    }

    /// Install `name` at `version` under `dir/node_modules`.
    pub fn install_at(&self, dir: &Path, name: &str, version: &str) -> Result<PathBuf> {
        let descriptor = json!({
            "name": name,
            "version": version,
            "main": "index.js",
        });
        let content = serde_json::to_string_pretty(&descriptor)?;
        write_descriptor(dir, name, &content)
    }

    /// Write `content` verbatim as the descriptor of `name`.
    pub fn install_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        write_descriptor(self.root(), name, content)
    }

    /// Write `depsat.toml` at the project root.
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        self.write_file(CONFIG_FILE, content)
    }

    /// Write an arbitrary file relative to the project root.
    pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

fn write_descriptor(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let package_dir = dir.join(MODULES_DIR).join(name);
    fs::create_dir_all(&package_dir)
        .with_context(|| format!("Failed to create {}", package_dir.display()))?;
    let path = package_dir.join(PACKAGE_DESCRIPTOR);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Canned `depsat.toml` contents.
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    pub content: String,
    pub name: String,
}

impl ConfigFixture {
    /// Node modules environment with mixed shorthand and structured constraints
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r#"
[environment]
provider = "node-modules"

[constraints]
typescript = "4.7.0"
eslint = { range = ">=8 <10" }
"#
            .trim()
            .to_string(),
        }
    }

    /// Constraint that opts out of prereleases
    pub fn prerelease_opt_out() -> Self {
        Self {
            name: "prerelease_opt_out".to_string(),
            content: r#"
[constraints]
vitest = { range = ">=1.0.0-beta", options = { includePrerelease = false } }
"#
            .trim()
            .to_string(),
        }
    }

    /// Cargo lockfile environment
    pub fn cargo_lock() -> Self {
        Self {
            name: "cargo_lock".to_string(),
            content: r#"
[environment]
provider = "cargo-lock"
lockfile = "Cargo.lock"

[constraints]
serde = "1.0.100"
syn = { range = "^2" }
"#
            .trim()
            .to_string(),
        }
    }

    /// Invalid TOML
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: "[constraints\ntypescript = \"4.7.0\"".to_string(),
        }
    }

    /// Write to `dir/depsat.toml`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {} config", self.name))?;
        Ok(path)
    }
}
