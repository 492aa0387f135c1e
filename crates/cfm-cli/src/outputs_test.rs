use super::*;
use cfm_core::{BranchName, Classification, EnvironmentId, ResolvedTarget};
use cfm_deploy::{AccessReport, MigrationReport};
use tempfile::TempDir;

fn outcome(applied: &[&str], alias: Option<AliasOutcome>) -> DeployOutcome {
    DeployOutcome {
        target: ResolvedTarget {
            branch: BranchName::try_new("production"),
            classification: Classification::Production,
            environment_id: EnvironmentId::try_new("master-20240305-0704").unwrap(),
        },
        environment_url: "https://app.contentful.com/spaces/abc/environments/master-20240305-0704"
            .to_string(),
        access: AccessReport {
            updated: vec!["k1".to_string(), "k2".to_string()],
            unchanged: vec![],
        },
        migrations: MigrationReport {
            previous_version: "1".to_string(),
            applied: applied.iter().map(|v| v.to_string()).collect(),
        },
        alias,
    }
}

#[test]
fn test_outputs_are_appended() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("output");
    std::fs::write(&path, "earlier=1\n").unwrap();

    write_outputs(
        Some(&path),
        &[("environment_url", "https://x/y"), ("environment_name", "GH-a")],
    )
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "earlier=1\nenvironment_url=https://x/y\nenvironment_name=GH-a\n"
    );
}

#[test]
fn test_summary_lists_migrations_and_alias() {
    let md = render_summary(&outcome(
        &["2", "3"],
        Some(AliasOutcome::Updated {
            alias: "master".to_string(),
            environment: "master-20240305-0704".to_string(),
        }),
    ));

    assert!(md.contains("### Contentful environment `master-20240305-0704`"));
    assert!(md.contains("| Classification | production |"));
    assert!(md.contains("| API keys | 2 updated, 0 unchanged |"));
    assert!(md.contains("| Migrations | 1 -> 3 (2, 3) |"));
    assert!(md.contains("| Alias | `master` -> `master-20240305-0704` |"));
}

#[test]
fn test_summary_without_pending_migrations_or_alias() {
    let md = render_summary(&outcome(&[], None));

    assert!(md.contains("| Migrations | none pending (at 1) |"));
    assert!(!md.contains("| Alias |"));
}

#[test]
fn test_step_summary_appends() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("summary.md");

    append_step_summary(&path, "one\n").unwrap();
    append_step_summary(&path, "two\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
}

#[test]
fn test_escape_workflow_data() {
    assert_eq!(escape_workflow_data("plain"), "plain");
    assert_eq!(escape_workflow_data("50%\r\nnext"), "50%25%0D%0Anext");
}

#[test]
fn test_error_annotation_is_single_line_without_repeated_causes() {
    let err = anyhow::Error::from(cfm_deploy::DeployError::Migration {
        version: "2".to_string(),
        source: cfm_platform::PlatformError::MigrationFailed {
            file: "2.js".to_string(),
            exit_code: 1,
            stderr: "Error: 100% broken\nValidation failed for field title".to_string(),
        },
    });

    let line = error_annotation(&err);

    assert!(!line.contains('\n'));
    assert_eq!(
        line,
        "::error::[D005] Migration 2 failed: [P007] Migration 2.js failed (exit 1): \
         Error: 100%25 broken%0AValidation failed for field title"
    );
    assert_eq!(line.matches("[P007]").count(), 1);
}

#[test]
fn test_error_annotation_keeps_context() {
    let err = anyhow::anyhow!("[C001] Invalid config: SPACE_ID must not be empty")
        .context("Invalid configuration");

    assert_eq!(
        error_annotation(&err),
        "::error::Invalid configuration: [C001] Invalid config: SPACE_ID must not be empty"
    );
}
