use super::*;
use cfm_platform::InMemoryPlatform;

fn id(s: &str) -> EnvironmentId {
    EnvironmentId::try_new(s).unwrap()
}

#[tokio::test]
async fn test_every_key_gains_the_environment() {
    let platform = InMemoryPlatform::new("space")
        .with_api_key("k1", &["master"])
        .with_api_key("k2", &["master", "dev"])
        .with_api_key("k3", &[]);

    let mut report = grant_api_key_access(&platform, &id("GH-feat"), 2)
        .await
        .unwrap();
    report.updated.sort();
    assert_eq!(report.updated, vec!["k1", "k2", "k3"]);
    assert!(report.unchanged.is_empty());

    for key_id in ["k1", "k2", "k3"] {
        let key = platform.api_key(key_id).unwrap();
        let last = key.environments.last().unwrap();
        assert_eq!(last.id(), "GH-feat");
        assert_eq!(last.sys.link_type, "Environment");
        assert_eq!(key.sys.version, Some(2));
    }
}

#[tokio::test]
async fn test_keys_with_access_are_left_alone() {
    let platform = InMemoryPlatform::new("space")
        .with_api_key("k1", &["master", "dev"])
        .with_api_key("k2", &["master"]);

    let report = grant_api_key_access(&platform, &id("dev"), 4).await.unwrap();
    assert_eq!(report.updated, vec!["k2"]);
    assert_eq!(report.unchanged, vec!["k1"]);
    assert_eq!(platform.calls_of("update_api_key"), vec!["update_api_key k2"]);
}

#[tokio::test]
async fn test_failed_update_fails_the_stage() {
    let platform = InMemoryPlatform::new("space")
        .with_api_key("k1", &[])
        .with_api_key("k2", &[])
        .fail_api_key("k2");

    let err = grant_api_key_access(&platform, &id("GH-x"), 1)
        .await
        .unwrap_err();
    match err {
        DeployError::ApiKeyUpdate { key, source } => {
            assert_eq!(key, "k2");
            assert!(source.to_string().contains("429"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // No rollback of keys already updated
    assert_eq!(platform.api_key("k1").unwrap().environments.len(), 1);
}

#[tokio::test]
async fn test_no_keys() {
    let platform = InMemoryPlatform::new("space");
    let report = grant_api_key_access(&platform, &id("GH-x"), 4).await.unwrap();
    assert_eq!(report, AccessReport::default());
}
