//! Print the installed version of packages.
//!
//! ```bash
//! depsat resolve typescript eslint
//! depsat resolve @types/node --root ./web --json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::CliConfig;
use crate::metadata::resolve_installed_version;

/// Command to look up installed versions.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Package names to look up
    #[arg(required = true, value_name = "NAME")]
    pub packages: Vec<String>,

    /// Resolve node modules from DIR
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print a JSON array
    #[arg(long)]
    pub json: bool,
}

/// One resolved package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPackage {
    /// Package name
    pub name: String,
    /// Installed version; `null` when not installed
    pub version: Option<String>,
}

impl ResolveCommand {
    /// Look up every package and print the results.
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let resolved = self.run(config)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&resolved)?);
            return Ok(());
        }

        for package in &resolved {
            match &package.version {
                Some(version) => println!("{} {}", package.name.bold(), version),
                None => println!("{} {}", package.name.bold(), "not installed".yellow()),
            }
        }
        Ok(())
    }

    /// Look up every package, stopping at the first error.
    pub fn run(&self, config: &CliConfig) -> Result<Vec<ResolvedPackage>> {
        let loaded = config.load_config()?;
        let provider = config.provider(self.root.as_deref(), loaded.as_ref())?;

        self.packages
            .iter()
            .map(|name| -> Result<ResolvedPackage> {
                Ok(ResolvedPackage {
                    name: name.clone(),
                    version: resolve_installed_version(&provider, name)?,
                })
            })
            .collect()
    }
}
