//! Integration test suite for depsat
//!
//! End-to-end tests that run the `depsat` binary against temporary project
//! directories and check its output and exit codes.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **check**: `depsat check` with flags and with `depsat.toml`
//! - **resolve**: `depsat resolve` output
//! - **errors**: error rendering and exit code 2

use assert_cmd::Command;
use std::path::Path;

mod check;
mod errors;
mod resolve;

/// `depsat` invocation rooted at `dir`, with logging disabled.
pub fn depsat(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("depsat").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}
