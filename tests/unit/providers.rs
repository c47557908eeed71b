//! Provider construction through project configuration.

use anyhow::Result;

use depsat_cli::config::{ProjectConfig, ProviderKind};
use depsat_cli::metadata::resolve_installed_version;
use depsat_cli::test_utils::{ConfigFixture, NodeModulesFixture};

const LOCKFILE: &str = r#"
version = 4

[[package]]
name = "serde"
version = "1.0.210"

[[package]]
name = "syn"
version = "1.0.109"

[[package]]
name = "syn"
version = "2.0.77"
"#;

#[test]
fn node_modules_config_resolves_from_config_dir() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.install("typescript", "5.4.2")?;
    let path = ConfigFixture::basic().write_to(fixture.root())?;

    let nested = fixture.root().join("packages/app");
    std::fs::create_dir_all(&nested)?;
    let loaded = ProjectConfig::find(&nested)?.expect("config should be discovered");
    assert_eq!(loaded.path, path);
    assert_eq!(loaded.config.environment.provider, ProviderKind::NodeModules);

    let provider = loaded.build_provider()?;
    assert_eq!(resolve_installed_version(&provider, "typescript")?, Some("5.4.2".into()));
    assert_eq!(resolve_installed_version(&provider, "eslint")?, None);
    Ok(())
}

#[test]
fn cargo_lock_config_reports_highest_locked_version() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.write_file("Cargo.lock", LOCKFILE)?;
    let path = ConfigFixture::cargo_lock().write_to(fixture.root())?;

    let loaded = ProjectConfig::load_from(&path)?;
    let provider = loaded.build_provider()?;
    assert_eq!(resolve_installed_version(&provider, "syn")?, Some("2.0.77".into()));

    let satisfied = depsat_cli::satisfies_all_dependency_constraints(
        &provider,
        Some(&loaded.config.constraints),
    )?;
    assert!(satisfied);
    Ok(())
}

#[test]
fn invalid_config_is_rejected() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    let path = ConfigFixture::invalid_syntax().write_to(fixture.root())?;

    let err = ProjectConfig::load_from(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config"));
    Ok(())
}
