use super::*;
use chrono::TimeZone;

fn env(id: &str) -> EnvironmentId {
    EnvironmentId::try_new(id).unwrap()
}

fn policy(target: Option<&str>) -> BranchPolicy {
    BranchPolicy::new("production", "develop", env("dev"), target.map(env))
}

fn push(branch: &str) -> TriggerContext {
    TriggerContext {
        event_name: "push".to_string(),
        git_ref: Some(format!("refs/heads/{}", branch)),
        pr_head_ref: None,
    }
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 7, h, m, 5).unwrap()
}

#[test]
fn test_production_branch_gets_timestamped_id() {
    let resolved = policy(None).resolve(&push("production"), at(14, 32)).unwrap();
    assert_eq!(resolved.classification, Classification::Production);
    assert_eq!(resolved.environment_id, "master-20240307-1432");
}

#[test]
fn test_production_id_zero_pads_hours_and_minutes() {
    let id = production_environment_id(at(4, 5));
    assert_eq!(id, "master-20240307-0405");

    let midnight = production_environment_id(at(0, 0));
    assert_eq!(midnight, "master-20240307-0000");
}

#[test]
fn test_development_branch_reuses_dev_environment() {
    let resolved = policy(None).resolve(&push("develop"), at(9, 0)).unwrap();
    assert_eq!(resolved.classification, Classification::Development);
    assert_eq!(resolved.environment_id, "dev");
}

#[test]
fn test_feature_branch_gets_gh_prefix() {
    let resolved = policy(None)
        .resolve(&push("feat/checkout"), at(9, 0))
        .unwrap();
    assert_eq!(resolved.classification, Classification::Feature);
    assert_eq!(resolved.environment_id, "GH-feat-checkout");
    assert_eq!(resolved.branch.unwrap(), "feat-checkout");
}

#[test]
fn test_explicit_target_wins_for_every_branch() {
    let p = policy(Some("staging"));
    for branch in ["production", "develop", "feat/x"] {
        let resolved = p.resolve(&push(branch), at(9, 0)).unwrap();
        assert_eq!(resolved.classification, Classification::ExplicitTarget);
        assert_eq!(resolved.environment_id, "staging");
    }
}

#[test]
fn test_explicit_target_without_branch() {
    let trigger = TriggerContext {
        event_name: "workflow_dispatch".to_string(),
        git_ref: None,
        pr_head_ref: None,
    };
    let resolved = policy(Some("qa")).resolve(&trigger, at(9, 0)).unwrap();
    assert_eq!(resolved.environment_id, "qa");
    assert!(resolved.branch.is_none());
}

#[test]
fn test_unresolved_branch_without_target_fails() {
    let trigger = TriggerContext {
        event_name: "pull_request".to_string(),
        git_ref: Some("refs/pull/3/merge".to_string()),
        pr_head_ref: None,
    };
    let err = policy(None).resolve(&trigger, at(9, 0)).unwrap_err();
    assert!(matches!(err, CoreError::BranchUnresolved { .. }));
}

#[test]
fn test_configured_branch_names_are_normalized() {
    let p = BranchPolicy::new("refs/heads/release/main", "dev/next", env("dev"), None);
    assert_eq!(
        p.resolve(&push("release/main"), at(1, 2))
            .unwrap()
            .classification,
        Classification::Production
    );
    assert_eq!(
        p.resolve(&push("dev/next"), at(1, 2)).unwrap().classification,
        Classification::Development
    );
}

#[test]
fn test_classification_flags() {
    assert!(Classification::Feature.recreates_environment());
    assert!(!Classification::Production.recreates_environment());
    assert!(!Classification::Development.recreates_environment());
    assert!(!Classification::ExplicitTarget.recreates_environment());

    assert!(Classification::Production.updates_alias());
    assert!(!Classification::ExplicitTarget.updates_alias());
    assert!(!Classification::Feature.updates_alias());
}

#[test]
fn test_classification_display() {
    assert_eq!(Classification::ExplicitTarget.to_string(), "explicit-target");
    assert_eq!(Classification::Production.to_string(), "production");
}
