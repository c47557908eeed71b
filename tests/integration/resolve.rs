use depsat_cli::test_utils::NodeModulesFixture;
use predicates::prelude::*;

use crate::depsat;

/// Test resolving installed and missing packages
#[test]
fn test_resolve_text_output() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("@typescript-eslint/parser", "7.3.1").unwrap();

    depsat(fixture.root())
        .args(["resolve", "@typescript-eslint/parser", "eslint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@typescript-eslint/parser 7.3.1"))
        .stdout(predicate::str::contains("eslint not installed"));
}

/// Test JSON output keeps argument order
#[test]
fn test_resolve_json_output() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture.install("typescript", "5.4.2").unwrap();

    let output =
        depsat(fixture.root()).args(["resolve", "--json", "eslint", "typescript"]).assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let resolved: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        resolved,
        serde_json::json!([
            { "name": "eslint", "version": null },
            { "name": "typescript", "version": "5.4.2" }
        ])
    );
}

/// Test resolving through a cargo-lock environment
#[test]
fn test_resolve_cargo_lock() {
    let fixture = NodeModulesFixture::new().unwrap();
    fixture
        .write_file("Cargo.lock", "version = 4\n\n[[package]]\nname = \"serde\"\nversion = \"1.0.210\"\n")
        .unwrap();
    fixture.write_config("[environment]\nprovider = \"cargo-lock\"\n").unwrap();

    depsat(fixture.root())
        .args(["resolve", "serde"])
        .assert()
        .success()
        .stdout(predicate::str::contains("serde 1.0.210"));
}
