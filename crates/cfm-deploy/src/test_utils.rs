//! Shared test utilities for cfm-deploy

use cfm_core::config::{DEFAULT_VERSION_CONTENT_TYPE, DEFAULT_VERSION_FIELD};
use cfm_core::{BranchPolicy, DeployConfig, EnvironmentId, PollSettings};
use std::path::Path;
use std::time::Duration;

pub fn env_id(s: &str) -> EnvironmentId {
    EnvironmentId::try_new(s).unwrap()
}

/// Config with no polling delay and migrations read from `dir`.
pub fn make_config(dir: &Path, target: Option<&str>) -> DeployConfig {
    DeployConfig {
        space_id: "space1".to_string(),
        access_token: "token".to_string(),
        source_env_id: env_id("master"),
        policy: BranchPolicy::new("production", "develop", env_id("dev"), target.map(env_id)),
        migrations_dir: dir.to_path_buf(),
        version_content_type: DEFAULT_VERSION_CONTENT_TYPE.to_string(),
        version_field: DEFAULT_VERSION_FIELD.to_string(),
        poll: PollSettings {
            interval: Duration::ZERO,
            max_attempts: 5,
        },
        key_update_concurrency: 2,
        http_timeout: Duration::from_secs(5),
    }
}

/// Write empty migration scripts named after `versions`.
pub fn write_migrations(dir: &Path, versions: &[&str]) {
    for version in versions {
        std::fs::write(
            dir.join(cfm_core::file_of_version(version)),
            "module.exports = function (migration) {};\n",
        )
        .unwrap();
    }
}
