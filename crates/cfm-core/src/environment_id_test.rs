use super::*;

#[test]
fn test_environment_id_rejects_empty() {
    assert!(EnvironmentId::try_new("").is_none());
}

#[test]
fn test_environment_id_equality_with_str() {
    let id = EnvironmentId::try_new("GH-feat-login").unwrap();
    assert_eq!(id, "GH-feat-login");
    assert_eq!(id.as_str(), "GH-feat-login".to_string());
    assert!(id.starts_with("GH-"));
}

#[test]
fn test_environment_id_serializes_transparently() {
    let id = EnvironmentId::try_new("dev").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"dev\"");

    let back: EnvironmentId = serde_json::from_str("\"dev\"").unwrap();
    assert_eq!(back, id);
}

#[test]
fn test_environment_id_deserialize_empty_fails() {
    let result: Result<EnvironmentId, _> = serde_json::from_str("\"\"");
    assert!(result.is_err());
}

#[test]
fn test_branch_name_display() {
    let branch = BranchName::try_new("feature-x").unwrap();
    assert_eq!(format!("{}", branch), "feature-x");
}
