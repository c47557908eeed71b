//! Constraint evaluation against a node_modules tree on disk.

use anyhow::Result;

use depsat_cli::DepsatError;
use depsat_cli::constraints::{
    Constraint, ConstraintEvaluator, ConstraintOutcome, DependencyConstraints,
    satisfies_all_dependency_constraints, satisfies_dependency_constraint,
};
use depsat_cli::metadata::{CachedProvider, NodeModulesProvider};
use depsat_cli::test_utils::{NodeModulesFixture, init_test_logging};
use depsat_cli::version::MatchOptions;

fn declared(entries: &[(&str, Constraint)]) -> DependencyConstraints {
    entries.iter().map(|(name, constraint)| (name.to_string(), constraint.clone())).collect()
}

#[test]
fn typical_lint_toolchain_is_satisfied() -> Result<()> {
    init_test_logging(None);
    let fixture = NodeModulesFixture::new()?;
    fixture.install("typescript", "5.4.2")?;
    fixture.install("eslint", "8.57.0")?;
    fixture.install("@typescript-eslint/parser", "7.3.1")?;

    let provider = NodeModulesProvider::new(fixture.root());
    let constraints = declared(&[
        ("typescript", Constraint::at_least("4.7.0")),
        ("eslint", Constraint::range("^8.56.0 || ^9")),
        ("@typescript-eslint/parser", Constraint::range(">=7.0.0 <8")),
    ]);

    assert!(satisfies_all_dependency_constraints(&provider, Some(&constraints))?);
    Ok(())
}

#[test]
fn missing_package_fails_the_set() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.install("typescript", "5.4.2")?;

    let provider = NodeModulesProvider::new(fixture.root());
    let constraints = declared(&[
        ("typescript", Constraint::at_least("4.7.0")),
        ("eslint", Constraint::at_least("8.0.0")),
    ]);

    let failure = ConstraintEvaluator::new(&provider).first_unsatisfied(Some(&constraints))?;
    assert_eq!(failure, Some(("eslint".to_string(), ConstraintOutcome::NotInstalled)));
    Ok(())
}

#[test]
fn evaluation_stops_before_broken_descriptor() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.install("typescript", "4.0.0")?;
    fixture.install_raw("eslint", "{ not json")?;

    let provider = NodeModulesProvider::new(fixture.root());
    let constraints = declared(&[
        ("typescript", Constraint::at_least("4.7.0")),
        ("eslint", Constraint::at_least("8.0.0")),
    ]);

    assert!(!satisfies_all_dependency_constraints(&provider, Some(&constraints))?);
    Ok(())
}

#[test]
fn broken_descriptor_is_reported_when_reached() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.install_raw("eslint", "{ not json")?;

    let provider = NodeModulesProvider::new(fixture.root());
    let err =
        satisfies_dependency_constraint(&provider, "eslint", &Constraint::at_least("8.0.0"))
            .unwrap_err();
    assert!(matches!(err, DepsatError::MetadataParse { .. }));
    Ok(())
}

#[test]
fn prerelease_install_respects_options() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.install("vitest", "2.0.0-beta.3")?;
    let provider = NodeModulesProvider::new(fixture.root());

    let opted_out = Constraint::range_with(
        ">=2.0.0-beta",
        MatchOptions {
            include_prerelease: Some(false),
            loose: None,
        },
    );
    assert!(!satisfies_dependency_constraint(&provider, "vitest", &opted_out)?);
    assert!(satisfies_dependency_constraint(&provider, "vitest", &Constraint::range(">=2.0.0-beta"))?);
    assert!(!satisfies_dependency_constraint(&provider, "vitest", &Constraint::at_least("1.0.0"))?);
    assert!(satisfies_dependency_constraint(&provider, "vitest", &Constraint::at_least("2.0.0-beta.1"))?);
    Ok(())
}

#[test]
fn build_metadata_is_ignored() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.install("native-addon", "1.4.0+linux.x64")?;
    let provider = NodeModulesProvider::new(fixture.root());

    assert!(satisfies_dependency_constraint(&provider, "native-addon", &Constraint::range("1.4.0"))?);
    Ok(())
}

#[test]
fn cached_provider_gives_identical_answers() -> Result<()> {
    let fixture = NodeModulesFixture::new()?;
    fixture.install("typescript", "5.4.2")?;
    let provider = CachedProvider::new(NodeModulesProvider::new(fixture.root()));
    let constraints = declared(&[("typescript", Constraint::range("~5.4"))]);

    let first = satisfies_all_dependency_constraints(&provider, Some(&constraints))?;
    let second = satisfies_all_dependency_constraints(&provider, Some(&constraints))?;
    assert!(first && second);
    assert_eq!(provider.len(), 1);
    Ok(())
}
