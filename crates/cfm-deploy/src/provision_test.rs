use super::*;
use cfm_platform::InMemoryPlatform;
use std::time::Duration;

fn id(s: &str) -> EnvironmentId {
    EnvironmentId::try_new(s).unwrap()
}

fn fast_poll(max_attempts: u32) -> PollSettings {
    PollSettings {
        interval: Duration::ZERO,
        max_attempts,
    }
}

#[tokio::test]
async fn test_feature_run_deletes_and_recreates() {
    let platform = InMemoryPlatform::new("space")
        .with_environment("master", "ready")
        .with_environment("GH-feat", "ready")
        .with_status_sequence("GH-feat", &["ready", "queued", "ready"]);

    let env = provision_environment(
        &platform,
        &id("GH-feat"),
        &id("master"),
        Classification::Feature,
        fast_poll(10),
    )
    .await
    .unwrap();

    assert_eq!(env.sys.id, "GH-feat");
    assert_eq!(platform.calls_of("delete_environment"), vec!["delete_environment GH-feat"]);
    assert_eq!(
        platform.calls_of("create_environment"),
        vec!["create_environment GH-feat from master"]
    );
}

#[tokio::test]
async fn test_feature_run_creates_when_missing() {
    let platform = InMemoryPlatform::new("space")
        .with_environment("master", "ready")
        .with_status_sequence("GH-new", &["queued", "ready"]);

    provision_environment(
        &platform,
        &id("GH-new"),
        &id("master"),
        Classification::Feature,
        fast_poll(10),
    )
    .await
    .unwrap();

    assert!(platform.calls_of("delete_environment").is_empty());
    assert_eq!(platform.calls_of("create_environment").len(), 1);
}

#[tokio::test]
async fn test_development_run_reuses_existing() {
    let platform = InMemoryPlatform::new("space")
        .with_environment("master", "ready")
        .with_environment("dev", "ready");

    provision_environment(
        &platform,
        &id("dev"),
        &id("master"),
        Classification::Development,
        fast_poll(10),
    )
    .await
    .unwrap();

    assert!(platform.calls_of("delete_environment").is_empty());
    assert!(platform.calls_of("create_environment").is_empty());
}

#[tokio::test]
async fn test_explicit_target_is_never_deleted() {
    let platform = InMemoryPlatform::new("space")
        .with_environment("master", "ready")
        .with_environment("staging", "ready");

    provision_environment(
        &platform,
        &id("staging"),
        &id("master"),
        Classification::ExplicitTarget,
        fast_poll(3),
    )
    .await
    .unwrap();

    assert!(platform.calls_of("delete_environment").is_empty());
}

#[tokio::test]
async fn test_production_run_creates_timestamped_environment() {
    let platform = InMemoryPlatform::new("space")
        .with_environment("master", "ready")
        .with_status_sequence("master-20240101-0000", &["ready"]);

    provision_environment(
        &platform,
        &id("master-20240101-0000"),
        &id("master"),
        Classification::Production,
        fast_poll(3),
    )
    .await
    .unwrap();

    assert_eq!(
        platform.calls_of("create_environment"),
        vec!["create_environment master-20240101-0000 from master"]
    );
}

#[tokio::test]
async fn test_failed_status_is_fatal() {
    let platform = InMemoryPlatform::new("space")
        .with_environment("master", "ready")
        .with_status_sequence("GH-x", &["queued", "failed"]);

    let err = provision_environment(
        &platform,
        &id("GH-x"),
        &id("master"),
        Classification::Feature,
        fast_poll(10),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, DeployError::EnvironmentFailed { ref environment } if environment == "GH-x")
    );
}

#[tokio::test]
async fn test_poll_exhaustion_is_fatal() {
    let platform = InMemoryPlatform::new("space").with_environment("dev", "queued");

    let err = wait_until_ready(&platform, &id("dev"), fast_poll(4))
        .await
        .unwrap_err();

    match err {
        DeployError::EnvironmentNotReady {
            attempts,
            last_status,
            ..
        } => {
            assert_eq!(attempts, 4);
            assert_eq!(last_status, "queued");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(platform.calls_of("get_environment").len(), 4);
}

#[tokio::test]
async fn test_poll_stops_at_ready() {
    let platform = InMemoryPlatform::new("space")
        .with_environment("dev", "queued")
        .with_status_sequence("dev", &["queued", "queued", "ready"]);

    wait_until_ready(&platform, &id("dev"), fast_poll(10))
        .await
        .unwrap();
    assert_eq!(platform.calls_of("get_environment").len(), 3);
}
