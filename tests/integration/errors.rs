use depsat_cli::test_utils::{ConfigFixture, NodeModulesFixture};
use predicates::prelude::*;

use crate::depsat;

/// Test that a malformed range exits 2 with a suggestion
#[test]
fn test_malformed_range_is_an_error() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("eslint", "8.57.0").unwrap();

    depsat(fixture.root())
        .args(["check", "--range", "eslint=>=garbage"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid version range '>=garbage'"))
        .stderr(predicate::str::contains("suggestion"));
}

/// Test that a malformed range on a missing package is just unsatisfied
#[test]
fn test_malformed_range_on_missing_package() {
    let fixture = NodeModulesFixture::new().unwrap();

    depsat(fixture.root()).args(["check", "--range", "eslint=>=garbage"]).assert().code(1);
}

/// Test that unreadable metadata exits 2
#[test]
fn test_broken_descriptor_is_an_error() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install_raw("typescript", "{ \"name\": \"typescript\" }").unwrap();

    depsat(fixture.root())
        .args(["check", "--dep", "typescript=4.7.0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing \"version\" field"));
}

/// Test that checking without constraints or config exits 2
#[test]
fn test_missing_config_is_an_error() {
    let fixture = NodeModulesFixture::new().unwrap();

    depsat(fixture.root())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("depsat.toml not found"));
}

/// Test that a bad explicit config reports which file failed
#[test]
fn test_invalid_explicit_config_names_the_file() {
    let fixture = NodeModulesFixture::new().unwrap();
    let config = fixture.write_file("ci/depsat.toml", "[environment]\nprovider = \"pip\"\n").unwrap();

    depsat(fixture.root())
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("Failed to parse config from"))
        .stderr(predicate::str::contains("depsat.toml"));
}

/// Test that invalid TOML exits 2
#[test]
fn test_invalid_config_is_an_error() {
    let fixture = NodeModulesFixture::new().unwrap();
    ConfigFixture::invalid_syntax().write_to(fixture.root()).unwrap();

    depsat(fixture.root()).arg("check").assert().code(2).stderr(predicate::str::contains("error"));
}

/// Test that traversal-style package names are rejected
#[test]
fn test_invalid_package_name() {
    let fixture = NodeModulesFixture::new().unwrap();

    depsat(fixture.root())
        .args(["resolve", "../../etc"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid package name"));
}

/// Test that conflicting global flags are a usage error
#[test]
fn test_verbose_and_quiet_conflict() {
    let fixture = NodeModulesFixture::new().unwrap();
    depsat(fixture.root()).args(["-v", "-q", "check"]).assert().code(2);
}
