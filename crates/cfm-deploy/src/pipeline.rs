//! The deploy pipeline: every stage in its fixed order.

use crate::access::{grant_api_key_access, AccessReport};
use crate::alias::{update_alias, AliasOutcome};
use crate::error::DeployResult;
use crate::migrate::{run_pending_migrations, MigrationReport};
use crate::provision::provision_environment;
use cfm_core::config::PRODUCTION_ALIAS_ID;
use cfm_core::{DeployConfig, EnvironmentId, ResolvedTarget, TriggerContext};
use cfm_platform::{ContentPlatform, MigrationExecutor};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Default web app base URL for browseable environment links
pub const DEFAULT_APP_URL: &str = "https://app.contentful.com";

/// Browseable URL of an environment.
pub fn environment_url(app_url: &str, space_id: &str, environment: &EnvironmentId) -> String {
    format!(
        "{}/spaces/{}/environments/{}",
        app_url.trim_end_matches('/'),
        space_id,
        environment
    )
}

/// Everything a successful run produced
#[derive(Debug, Clone, Serialize)]
pub struct DeployOutcome {
    /// Branch, classification and environment id
    pub target: ResolvedTarget,

    /// Browseable URL of the environment
    pub environment_url: String,

    /// API key updates
    pub access: AccessReport,

    /// Migrations applied
    pub migrations: MigrationReport,

    /// Alias update, on production runs only
    pub alias: Option<AliasOutcome>,
}

impl DeployOutcome {
    /// Id of the environment the run operated on.
    pub fn environment_name(&self) -> &str {
        self.target.environment_id.as_str()
    }
}

/// A configured deploy run
pub struct Deployment {
    config: DeployConfig,
    platform: Arc<dyn ContentPlatform>,
    executor: Arc<dyn MigrationExecutor>,
    app_url: String,
}

impl Deployment {
    /// Create a deployment over a platform and migration executor.
    pub fn new(
        config: DeployConfig,
        platform: Arc<dyn ContentPlatform>,
        executor: Arc<dyn MigrationExecutor>,
    ) -> Self {
        Self {
            config,
            platform,
            executor,
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }

    /// Override the web app base URL used for the environment link.
    pub fn with_app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = app_url.into();
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &DeployConfig {
        &self.config
    }

    /// Run every stage. The first error aborts the remaining stages; only an
    /// alias failure is tolerated.
    pub async fn run(
        &self,
        trigger: &TriggerContext,
        now: DateTime<Utc>,
    ) -> DeployResult<DeployOutcome> {
        self.config.validate()?;
        let platform = self.platform.as_ref();

        let target = self.config.policy.resolve(trigger, now)?;
        log::info!(
            "Running on {} branch ({})",
            target.classification,
            target
                .branch
                .as_ref()
                .map(|b| b.as_str())
                .unwrap_or("<none>")
        );
        log::info!("ENVIRONMENT_ID: {}", target.environment_id);
        log::info!("SOURCE_ENV_ID: {}", self.config.source_env_id);

        provision_environment(
            platform,
            &target.environment_id,
            &self.config.source_env_id,
            target.classification,
            self.config.poll,
        )
        .await?;

        let access = grant_api_key_access(
            platform,
            &target.environment_id,
            self.config.key_update_concurrency,
        )
        .await?;

        let migrations = run_pending_migrations(
            platform,
            self.executor.as_ref(),
            &self.config,
            &target.environment_id,
        )
        .await?;

        log::info!("Checking if we need to update master alias");
        let alias = if target.classification.updates_alias() {
            Some(update_alias(platform, PRODUCTION_ALIAS_ID, &target.environment_id).await)
        } else {
            log::info!("No alias changes required");
            None
        };

        let environment_url = environment_url(
            &self.app_url,
            platform.space_id(),
            &target.environment_id,
        );

        Ok(DeployOutcome {
            target,
            environment_url,
            access,
            migrations,
            alias,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
