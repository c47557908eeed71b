//! Test utilities for depsat
//!
//! Helpers for building throwaway installed-package environments and config
//! files, plus one-time logging setup for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use depsat_cli::metadata::{NodeModulesProvider, resolve_installed_version};
//! use depsat_cli::test_utils::NodeModulesFixture;
//!
//! # fn example() -> anyhow::Result<()> {
//! let fixture = NodeModulesFixture::new()?;
//! fixture.install("typescript", "5.4.2")?;
//!
//! let provider = NodeModulesProvider::new(fixture.root());
//! assert_eq!(resolve_installed_version(&provider, "typescript")?, Some("5.4.2".into()));
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::{ConfigFixture, NodeModulesFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. `level` wins over `RUST_LOG`; with
/// neither set, logging stays off.
///
/// ```bash
/// RUST_LOG=depsat_cli=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
