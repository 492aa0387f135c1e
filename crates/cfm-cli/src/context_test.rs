use super::*;
use crate::cli::{MigrationArgs, SpaceArgs};
use serial_test::serial;
use std::collections::HashMap;
use tempfile::TempDir;

fn ci(vars: &[(&str, &str)]) -> CiEnvironment {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    CiEnvironment::from_lookup(|name| vars.get(name).cloned())
}

fn branch_args(target: Option<&str>) -> BranchArgs {
    BranchArgs {
        prod_branch: "production".to_string(),
        dev_branch: "develop".to_string(),
        dev_env_id: "dev".to_string(),
        target_env_id: target.map(String::from),
    }
}

fn run_args() -> RunArgs {
    RunArgs {
        space: SpaceArgs {
            space_id: "abc".to_string(),
            management_api_key: "secret".to_string(),
            source_env_id: "master".to_string(),
            api_url: "https://api.contentful.com".to_string(),
            app_url: "https://app.contentful.com".to_string(),
            http_timeout_secs: 30,
        },
        branch: branch_args(None),
        migrations: MigrationArgs {
            migrations_dir: "migrations".to_string(),
            version_content_type: "versionTracking".to_string(),
            version_field: "version".to_string(),
            migration_command: "contentful-migration".to_string(),
        },
        poll_interval_secs: 3,
        poll_max_attempts: 10,
        key_update_concurrency: 4,
    }
}

#[test]
fn test_push_uses_git_ref() {
    let ci = ci(&[
        ("GITHUB_EVENT_NAME", "push"),
        ("GITHUB_REF", "refs/heads/feat/x"),
        ("GITHUB_HEAD_REF", ""),
    ]);
    assert!(ci.head_ref.is_none());

    let trigger = ci.trigger_context().unwrap();
    assert_eq!(trigger.branch().unwrap(), "feat-x");
    assert!(trigger.pr_head_ref.is_none());
}

#[test]
fn test_pull_request_reads_head_ref_from_payload() {
    let tmp = TempDir::new().unwrap();
    let payload = tmp.path().join("event.json");
    std::fs::write(
        &payload,
        r#"{"pull_request": {"head": {"ref": "feature/login"}}}"#,
    )
    .unwrap();
    let ci = ci(&[
        ("GITHUB_EVENT_NAME", "pull_request"),
        ("GITHUB_REF", "refs/pull/7/merge"),
        ("GITHUB_EVENT_PATH", payload.to_str().unwrap()),
        ("GITHUB_HEAD_REF", "ignored"),
    ]);

    let trigger = ci.trigger_context().unwrap();
    assert_eq!(trigger.pr_head_ref.as_deref(), Some("feature/login"));
    assert_eq!(trigger.branch().unwrap(), "feature-login");
}

#[test]
fn test_pull_request_falls_back_to_head_ref() {
    let ci = ci(&[
        ("GITHUB_EVENT_NAME", "pull_request"),
        ("GITHUB_REF", "refs/pull/7/merge"),
        ("GITHUB_EVENT_PATH", "/nonexistent/event.json"),
        ("GITHUB_HEAD_REF", "fix/typo"),
    ]);

    let trigger = ci.trigger_context().unwrap();
    assert_eq!(trigger.branch().unwrap(), "fix-typo");
}

#[test]
fn test_migrations_dir_resolves_against_workspace() {
    let ci = ci(&[("GITHUB_WORKSPACE", "/home/runner/work/site")]);
    assert_eq!(
        ci.migrations_dir("migrations"),
        PathBuf::from("/home/runner/work/site/migrations")
    );
    assert_eq!(ci.migrations_dir("/abs"), PathBuf::from("/abs"));
}

#[test]
fn test_blank_target_counts_as_unset() {
    let policy = branch_policy(&branch_args(Some("  "))).unwrap();
    assert!(policy.target_env_id.is_none());

    let policy = branch_policy(&branch_args(Some("staging"))).unwrap();
    assert_eq!(policy.target_env_id.unwrap(), "staging");
}

#[test]
fn test_deploy_config_from_args() {
    let config = deploy_config(&run_args(), &ci(&[])).unwrap();
    assert_eq!(config.space_id, "abc");
    assert_eq!(config.source_env_id, "master");
    assert_eq!(config.poll.interval, Duration::from_secs(3));
    assert_eq!(config.migrations_dir, PathBuf::from("migrations"));
}

#[test]
fn test_deploy_config_rejects_blank_token() {
    let mut args = run_args();
    args.space.management_api_key = "   ".to_string();
    let err = deploy_config(&args, &ci(&[])).unwrap_err();
    assert!(format!("{:#}", err).contains("MANAGEMENT_API_KEY"));
}

#[test]
fn test_deploy_config_rejects_zero_http_timeout() {
    let mut args = run_args();
    args.space.http_timeout_secs = 0;
    let err = deploy_config(&args, &ci(&[])).unwrap_err();
    assert!(format!("{:#}", err).contains("HTTP_TIMEOUT_SECS"));
}

#[test]
fn test_deploy_config_rejects_zero_concurrency() {
    let mut args = run_args();
    args.key_update_concurrency = 0;
    assert!(deploy_config(&args, &ci(&[])).is_err());
}

// These tests modify environment variables and must run serially
#[test]
#[serial]
fn test_from_env_reads_runner_variables() {
    std::env::set_var("GITHUB_EVENT_NAME", "push");
    std::env::set_var("GITHUB_REF", "refs/heads/develop");
    std::env::set_var("GITHUB_OUTPUT", "/tmp/out");
    std::env::remove_var("GITHUB_STEP_SUMMARY");

    let ci = CiEnvironment::from_env();

    std::env::remove_var("GITHUB_EVENT_NAME");
    std::env::remove_var("GITHUB_REF");
    std::env::remove_var("GITHUB_OUTPUT");

    assert_eq!(ci.event_name, "push");
    assert_eq!(ci.git_ref.as_deref(), Some("refs/heads/develop"));
    assert_eq!(ci.output, Some(PathBuf::from("/tmp/out")));
    assert!(ci.step_summary.is_none());
}
