use super::*;
use serde_json::json;

fn env_id(id: &str) -> EnvironmentId {
    EnvironmentId::try_new(id).unwrap()
}

#[test]
fn test_environment_status_from_payload() {
    let payload = json!({
        "name": "GH-feat-x",
        "sys": {
            "id": "GH-feat-x",
            "version": 1,
            "status": {"sys": {"type": "Link", "linkType": "Status", "id": "ready"}}
        }
    });
    let env: Environment = serde_json::from_value(payload).unwrap();
    assert_eq!(env.status(), EnvironmentStatus::Ready);
}

#[test]
fn test_environment_without_status_is_queued() {
    let env: Environment = serde_json::from_value(json!({"sys": {"id": "e"}})).unwrap();
    assert_eq!(env.status(), EnvironmentStatus::Queued);
}

#[test]
fn test_unknown_status_is_preserved() {
    assert_eq!(
        EnvironmentStatus::from_id("cloning"),
        EnvironmentStatus::Other("cloning".to_string())
    );
    assert_eq!(EnvironmentStatus::from_id("cloning").to_string(), "cloning");
}

#[test]
fn test_environment_link_shape() {
    let value = serde_json::to_value(Link::environment(&env_id("GH-a"))).unwrap();
    assert_eq!(
        value,
        json!({"sys": {"type": "Link", "linkType": "Environment", "id": "GH-a"}})
    );
}

#[test]
fn test_api_key_grant_is_idempotent() {
    let mut key: ApiKey = serde_json::from_value(json!({
        "sys": {"id": "key1", "version": 3},
        "name": "Website",
        "environments": [{"sys": {"type": "Link", "linkType": "Environment", "id": "master"}}]
    }))
    .unwrap();

    assert!(key.grant_environment(&env_id("GH-a")));
    assert!(!key.grant_environment(&env_id("GH-a")));
    assert!(!key.grant_environment(&env_id("master")));
    assert_eq!(key.environments.len(), 2);
}

#[test]
fn test_entry_localized_fields() {
    let mut entry: Entry = serde_json::from_value(json!({
        "sys": {"id": "marker", "version": 5},
        "fields": {"version": {"en-US": "3"}}
    }))
    .unwrap();

    assert_eq!(entry.localized_str("version", "en-US"), Some("3"));
    assert_eq!(entry.localized_str("version", "de-DE"), None);
    assert_eq!(entry.localized_str("title", "en-US"), None);

    entry.set_localized("version", "en-US", "4");
    assert_eq!(entry.localized_str("version", "en-US"), Some("4"));
}

#[test]
fn test_collection_defaults() {
    let page: Collection<Locale> = serde_json::from_value(json!({})).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}
