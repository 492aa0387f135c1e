//! Version-tracked migration runner.
//!
//! The target environment holds exactly one entry of the version-tracking
//! content type. Its localized version field names the last migration applied
//! to the environment. Every migration on disk after that one is run in order,
//! and the marker is updated and published after each success, so a failure
//! leaves the marker at the last migration that completed.

use crate::error::{DeployError, DeployResult};
use cfm_core::{discover_migrations, pending_after, DeployConfig, EnvironmentId};
use cfm_platform::{ContentPlatform, Entry, MigrationExecutor, MigrationRequest};
use serde::Serialize;

/// Outcome of a migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Version stored in the marker before the run
    pub previous_version: String,

    /// Versions applied, in order
    pub applied: Vec<String>,
}

impl MigrationReport {
    /// Version stored in the marker after the run.
    pub fn current_version(&self) -> &str {
        self.applied
            .last()
            .map(String::as_str)
            .unwrap_or(&self.previous_version)
    }
}

/// Code of the environment's default locale.
pub async fn default_locale(
    platform: &dyn ContentPlatform,
    environment: &EnvironmentId,
) -> DeployResult<String> {
    platform
        .list_locales(environment)
        .await?
        .into_iter()
        .find(|locale| locale.default)
        .map(|locale| locale.code)
        .ok_or_else(|| DeployError::InvalidState {
            message: format!("environment {} has no default locale", environment),
        })
}

/// The single version marker entry of the environment.
pub async fn find_version_marker(
    platform: &dyn ContentPlatform,
    environment: &EnvironmentId,
    content_type: &str,
) -> DeployResult<Entry> {
    let mut entries = platform.list_entries(environment, content_type).await?;
    if entries.len() != 1 {
        return Err(DeployError::InvalidState {
            message: format!(
                "There should only be one entry of type '{}', found {}",
                content_type,
                entries.len()
            ),
        });
    }
    Ok(entries.remove(0))
}

/// Run every migration newer than the environment's version marker.
pub async fn run_pending_migrations(
    platform: &dyn ContentPlatform,
    executor: &dyn MigrationExecutor,
    config: &DeployConfig,
    environment: &EnvironmentId,
) -> DeployResult<MigrationReport> {
    log::info!("Read all the available migrations from the file system");
    let available = discover_migrations(&config.migrations_dir)?;
    log::debug!("Found {} migrations", available.len());

    let locale = default_locale(platform, environment).await?;

    log::info!("Figure out latest ran migration of the contentful space");
    let mut marker =
        find_version_marker(platform, environment, &config.version_content_type).await?;
    let previous_version = marker
        .localized_str(&config.version_field, &locale)
        .ok_or_else(|| DeployError::InvalidState {
            message: format!(
                "version entry {} has no '{}' value for locale {}",
                marker.sys.id, config.version_field, locale
            ),
        })?
        .to_string();

    log::info!("Evaluate which migrations to run");
    let pending = pending_after(&available, &previous_version)?;
    if pending.is_empty() {
        log::info!("Already at version {}; nothing to run", previous_version);
    }

    log::info!("Run migrations and update version entry");
    let mut applied = Vec::with_capacity(pending.len());
    for migration in pending {
        let version = migration.version.to_string();
        log::info!("Running {}", migration.path.display());

        let request = MigrationRequest {
            space_id: config.space_id.clone(),
            environment_id: environment.clone(),
            access_token: config.access_token.clone(),
            yes: true,
            file_path: migration.path.clone(),
        };
        executor
            .run_migration(&request)
            .await
            .map_err(|source| DeployError::Migration {
                version: version.clone(),
                source,
            })?;
        log::info!("{} succeeded", version);

        marker.set_localized(&config.version_field, &locale, version.as_str());
        marker = platform.update_entry(environment, &marker).await?;
        marker = platform.publish_entry(environment, &marker).await?;
        log::info!("Updated version entry to {}", version);

        applied.push(version);
    }

    Ok(MigrationReport {
        previous_version,
        applied,
    })
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;
