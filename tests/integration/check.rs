use depsat_cli::test_utils::{ConfigFixture, NodeModulesFixture};
use predicates::prelude::*;

use crate::depsat;

/// Test that satisfied inline constraints exit 0
#[test]
fn test_check_inline_satisfied() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("typescript", "5.4.2").unwrap();
    fixture.install("eslint", "8.57.0").unwrap();

    depsat(fixture.root())
        .args(["check", "--dep", "typescript=4.7.0", "--range", "eslint=>=8 <10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 dependency constraint(s) satisfied"));
}

/// Test that an unmet constraint exits 1 and names the package
#[test]
fn test_check_inline_unmet() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("eslint", "8.57.0").unwrap();

    depsat(fixture.root())
        .args(["check", "--range", "eslint=^9.0.0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("eslint"))
        .stdout(predicate::str::contains("installed 8.57.0 does not satisfy ^9.0.0"));
}

/// Test that a missing package is unsatisfied rather than an error
#[test]
fn test_check_not_installed() {
    let fixture = NodeModulesFixture::new().unwrap();

    depsat(fixture.root())
        .args(["check", "--dep", "typescript=4.7.0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not installed"));
}

/// Test that constraints are read from depsat.toml when no flags are given
#[test]
fn test_check_uses_config() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("typescript", "5.4.2").unwrap();
    fixture.install("eslint", "9.1.0").unwrap();
    ConfigFixture::basic().write_to(fixture.root()).unwrap();

    depsat(fixture.root()).arg("check").assert().success();
}

/// Test that an explicit --config path is honored
#[test]
fn test_check_explicit_config() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("vitest", "1.0.0-beta.2").unwrap();
    // Relative roots resolve against the config's directory
    let content = format!(
        "[environment]\nroot = \"..\"\n\n{}",
        ConfigFixture::prerelease_opt_out().content
    );
    let config = fixture.write_file("ci/prerelease.toml", &content).unwrap();

    depsat(fixture.root())
        .args(["check", "--config"])
        .arg(&config)
        .assert()
        .code(1);
}

/// Test the prerelease opt-out flag on inline ranges
#[test]
fn test_check_exclude_prerelease_flag() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("vitest", "1.0.0-beta.2").unwrap();

    depsat(fixture.root()).args(["check", "--range", "vitest=>=1.0.0-alpha"]).assert().success();

    depsat(fixture.root())
        .args(["check", "--range", "vitest=>=1.0.0-alpha", "--exclude-prerelease"])
        .assert()
        .code(1);
}

/// Test JSON output for a failing check
#[test]
fn test_check_json_output() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("typescript", "4.0.0").unwrap();

    let output = depsat(fixture.root())
        .args(["check", "--json", "--dep", "typescript=4.7.0", "--dep", "eslint=8.0.0"])
        .assert()
        .code(1);

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["satisfied"], false);
    assert_eq!(report["checked"], 1);
    assert_eq!(report["failure"]["package"], "typescript");
    assert_eq!(report["failure"]["reason"], "unmet");
    assert_eq!(report["failure"]["range"], ">=4.7.0");
}

/// Test that --root points resolution at another directory
#[test]
fn test_check_root_flag() {
    let fixture = NodeModulesFixture::new().unwrap();
    let web = fixture.root().join("web");
    fixture.install_at(&web, "react", "18.3.1").unwrap();

    depsat(fixture.root()).args(["check", "--dep", "react=18.0.0"]).assert().code(1);

    depsat(fixture.root())
        .args(["check", "--dep", "react=18.0.0", "--root"])
        .arg(&web)
        .assert()
        .success();
}

/// Test that an empty constraint table is satisfied
#[test]
fn test_check_empty_config_constraints() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.write_config("[environment]\ncache = false\n").unwrap();

    depsat(fixture.root())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 dependency constraint(s) satisfied"));
}
