//! Command-line interface for depsat.
//!
//! # Commands
//!
//! - `check` - Evaluate a constraint set against the installed packages
//! - `resolve` - Print the installed version of one or more packages
//!
//! # Global Options
//!
//! - `-v, --verbose` - Debug logging on stderr
//! - `-q, --quiet` - No logging at all
//! - `--config <PATH>` - Use this `depsat.toml` instead of discovering one
//!
//! Without `--verbose` or `--quiet` the log filter comes from `RUST_LOG`,
//! falling back to warnings only.
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Every constraint is satisfied |
//! | 1 | At least one constraint is not satisfied |
//! | 2 | The check could not be performed |
//!
//! # Examples
//!
//! ```bash
//! # Constraints from depsat.toml
//! depsat check
//!
//! # Ad-hoc constraints
//! depsat check --dep typescript=4.7.0 --range 'eslint=>=8 <10'
//!
//! # Machine-readable output
//! depsat check --json
//!
//! # What is installed?
//! depsat resolve typescript @typescript-eslint/parser
//! ```

mod check;
mod resolve;


pub use check::{CheckCommand, CheckReport, FailureReport};
pub use resolve::{ResolveCommand, ResolvedPackage};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{LoadedConfig, ProjectConfig, wrap};
use crate::metadata::{NodeModulesProvider, PackageMetadataProvider};

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit config file from `--config`
    pub config_path: Option<PathBuf>,

    /// Directory discovery starts from; the process working directory when `None`
    pub working_dir: Option<PathBuf>,
}

impl CliConfig {
    fn working_dir(&self) -> Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    /// Load the explicit config, or discover one from the working directory.
    pub fn load_config(&self) -> Result<Option<LoadedConfig>> {
        let working_dir = self.working_dir()?;
        ProjectConfig::load_or_find(self.config_path.as_deref(), &working_dir)
    }

    /// Provider for a command.
    ///
    /// `--root` selects a node-modules provider at that directory. Otherwise
    /// the config's `[environment]` decides, and without a config the working
    /// directory's `node_modules` tree is used.
    pub fn provider(
        &self,
        root: Option<&Path>,
        config: Option<&LoadedConfig>,
    ) -> Result<Box<dyn PackageMetadataProvider>> {
        if let Some(root) = root {
            return Ok(wrap(NodeModulesProvider::new(root), true));
        }
        match config {
            Some(loaded) => loaded.build_provider(),
            None => Ok(wrap(NodeModulesProvider::new(self.working_dir()?), true)),
        }
    }
}

/// Main CLI structure
#[derive(Parser, Debug)]
#[command(
    name = "depsat",
    about = "Check installed package versions against dependency constraints",
    version,
    long_about = "depsat decides whether the packages installed in an environment satisfy a set of \
                  declared version constraints, so harnesses can skip cases whose requirements \
                  are not met."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to depsat.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether installed packages satisfy a constraint set
    Check(CheckCommand),

    /// Print installed package versions
    Resolve(ResolveCommand),
}

impl Cli {
    /// Run the selected command.
    ///
    /// Returns `Ok(false)` when the command ran but its constraints were not
    /// satisfied.
    pub fn execute(self) -> Result<bool> {
        self.init_logging();
        let config = self.build_config();
        self.execute_with_config(&config)
    }

    /// Shared settings derived from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        CliConfig {
            config_path: self.config.clone(),
            working_dir: None,
        }
    }

    /// Run the selected command with explicit settings.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<bool> {
        match self.command {
            Commands::Check(cmd) => cmd.execute(config),
            Commands::Resolve(cmd) => cmd.execute(config).map(|()| true),
        }
    }

    fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    }

    fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
