//! Production alias repointing.
//!
//! A failed alias update never fails the run: the outcome is returned as a
//! value and logged, and the caller carries on.

use crate::error::DeployResult;
use cfm_core::EnvironmentId;
use cfm_platform::{ContentPlatform, Link};
use serde::Serialize;
use std::fmt;

/// Result of trying to repoint an alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AliasOutcome {
    /// The alias now points at `environment`
    Updated { alias: String, environment: String },
    /// The update was attempted and failed
    Failed { alias: String, message: String },
}

impl fmt::Display for AliasOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasOutcome::Updated { alias, environment } => {
                write!(f, "alias {} -> {}", alias, environment)
            }
            AliasOutcome::Failed { alias, message } => {
                write!(f, "alias {} not updated: {}", alias, message)
            }
        }
    }
}

async fn repoint(
    platform: &dyn ContentPlatform,
    alias_id: &str,
    environment: &EnvironmentId,
) -> DeployResult<String> {
    let mut alias = platform.get_alias(alias_id).await?;
    alias.environment = Link::environment(environment);
    let stored = platform.update_alias(&alias).await?;
    Ok(stored.environment.id().to_string())
}

/// Point `alias_id` at `environment`, reporting failure as a value.
pub async fn update_alias(
    platform: &dyn ContentPlatform,
    alias_id: &str,
    environment: &EnvironmentId,
) -> AliasOutcome {
    log::info!("Updating {} alias.", alias_id);
    match repoint(platform, alias_id, environment).await {
        Ok(target) => {
            log::info!("alias {} updated.", alias_id);
            AliasOutcome::Updated {
                alias: alias_id.to_string(),
                environment: target,
            }
        }
        Err(e) => {
            log::error!("Failed to update alias {}: {}", alias_id, e);
            AliasOutcome::Failed {
                alias: alias_id.to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
#[path = "alias_test.rs"]
mod tests;
