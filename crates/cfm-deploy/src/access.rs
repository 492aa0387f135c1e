//! API key access propagation.

use crate::error::{DeployError, DeployResult};
use cfm_core::EnvironmentId;
use cfm_platform::{ApiKey, ContentPlatform};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;

/// What happened to the space's API keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessReport {
    /// Keys that gained access, in completion order
    pub updated: Vec<String>,

    /// Keys that already had access
    pub unchanged: Vec<String>,
}

/// Give every API key of the space access to `environment`.
///
/// Updates run concurrently, at most `concurrency` at a time. The first
/// failure fails the stage; keys already updated stay updated.
pub async fn grant_api_key_access(
    platform: &dyn ContentPlatform,
    environment: &EnvironmentId,
    concurrency: usize,
) -> DeployResult<AccessReport> {
    log::info!("Update API Keys to allow access to new environment");

    let keys = platform.list_api_keys().await?;
    let mut report = AccessReport::default();
    let mut pending: Vec<ApiKey> = Vec::with_capacity(keys.len());
    for mut key in keys {
        if key.grant_environment(environment) {
            pending.push(key);
        } else {
            log::debug!("API key {} already has access to {}", key.sys.id, environment);
            report.unchanged.push(key.sys.id);
        }
    }

    report.updated = stream::iter(pending)
        .map(|key| async move {
            log::info!("Updating - {}", key.sys.id);
            platform
                .update_api_key(&key)
                .await
                .map(|stored| stored.sys.id)
                .map_err(|source| DeployError::ApiKeyUpdate {
                    key: key.sys.id.clone(),
                    source,
                })
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok(report)
}

#[cfg(test)]
#[path = "access_test.rs"]
mod tests;
