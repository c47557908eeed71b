//! Global constants used throughout the depsat codebase.
//!
//! File names and directory names that more than one module needs are
//! defined here so the lookup rules stay in one place.

/// Descriptor file every installed node-style package carries.
pub const PACKAGE_DESCRIPTOR: &str = "package.json";

/// Directory that holds installed node-style packages.
pub const MODULES_DIR: &str = "node_modules";

/// Project configuration file name, discovered by walking up from the working directory.
pub const CONFIG_FILE: &str = "depsat.toml";

/// Default lockfile for the `cargo-lock` provider.
pub const CARGO_LOCKFILE: &str = "Cargo.lock";

/// Location label used by the in-memory provider in error messages.
pub const MEMORY_LOCATION: &str = "<memory>";
