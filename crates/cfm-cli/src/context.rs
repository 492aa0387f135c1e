//! Runtime context for CLI commands
//!
//! Reads the GitHub Actions variables describing the run and turns the
//! parsed arguments into the immutable `DeployConfig` the stages share.

use anyhow::{Context, Result};
use cfm_core::{
    config::resolve_migrations_dir, BranchPolicy, DeployConfig, EnvironmentId, PollSettings,
    TriggerContext,
};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{BranchArgs, RunArgs};

/// The CI runner's view of the current workflow run
#[derive(Debug, Clone, Default)]
pub(crate) struct CiEnvironment {
    /// `GITHUB_EVENT_NAME`
    pub event_name: String,

    /// `GITHUB_REF`
    pub git_ref: Option<String>,

    /// `GITHUB_EVENT_PATH`, the JSON payload of the triggering event
    pub event_path: Option<PathBuf>,

    /// `GITHUB_HEAD_REF`, set on pull-request events
    pub head_ref: Option<String>,

    /// `GITHUB_WORKSPACE`, the checkout root
    pub workspace: Option<PathBuf>,

    /// `GITHUB_OUTPUT`, the step outputs file
    pub output: Option<PathBuf>,

    /// `GITHUB_STEP_SUMMARY`, the markdown job summary file
    pub step_summary: Option<PathBuf>,
}

impl CiEnvironment {
    /// Read the runner variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the runner variables through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            event_name: get("GITHUB_EVENT_NAME").unwrap_or_default(),
            git_ref: get("GITHUB_REF"),
            event_path: get("GITHUB_EVENT_PATH").map(PathBuf::from),
            head_ref: get("GITHUB_HEAD_REF"),
            workspace: get("GITHUB_WORKSPACE").map(PathBuf::from),
            output: get("GITHUB_OUTPUT").map(PathBuf::from),
            step_summary: get("GITHUB_STEP_SUMMARY").map(PathBuf::from),
        }
    }

    /// Describe the trigger. Pull-request events take their branch from the
    /// event payload, falling back to `GITHUB_HEAD_REF` when the payload
    /// cannot be read.
    pub fn trigger_context(&self) -> Result<TriggerContext> {
        let mut trigger = TriggerContext {
            event_name: self.event_name.clone(),
            git_ref: self.git_ref.clone(),
            pr_head_ref: None,
        };
        if !trigger.is_pull_request() {
            return Ok(trigger);
        }

        match self.read_payload() {
            Ok(Some(from_payload)) if from_payload.pr_head_ref.is_some() => {
                return Ok(from_payload);
            }
            Ok(_) => log::warn!("Event payload has no pull_request.head.ref"),
            Err(e) => log::warn!("Could not read event payload: {:#}", e),
        }
        if self.head_ref.is_some() {
            log::warn!("Falling back to GITHUB_HEAD_REF for the pull request branch");
        }
        trigger.pr_head_ref = self.head_ref.clone();
        Ok(trigger)
    }

    fn read_payload(&self) -> Result<Option<TriggerContext>> {
        let Some(path) = &self.event_path else {
            return Ok(None);
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let trigger = TriggerContext::from_event_payload(
            self.event_name.clone(),
            self.git_ref.clone(),
            &path.display().to_string(),
            &json,
        )?;
        Ok(Some(trigger))
    }

    /// Resolve a migrations directory against the checkout root.
    pub fn migrations_dir(&self, dir: &str) -> PathBuf {
        resolve_migrations_dir(self.workspace.as_deref(), dir)
    }
}

fn environment_id(value: &str, name: &str) -> Result<EnvironmentId> {
    EnvironmentId::try_new(value.trim()).with_context(|| format!("{} must not be empty", name))
}

/// Build the branch policy. A blank `TARGET_ENV_ID` counts as unset.
pub(crate) fn branch_policy(args: &BranchArgs) -> Result<BranchPolicy> {
    let target = args
        .target_env_id
        .as_deref()
        .and_then(|t| EnvironmentId::try_new(t.trim()));
    Ok(BranchPolicy::new(
        &args.prod_branch,
        &args.dev_branch,
        environment_id(&args.dev_env_id, "DEV_ENV_ID")?,
        target,
    ))
}

/// Build and validate the run configuration.
pub(crate) fn deploy_config(args: &RunArgs, ci: &CiEnvironment) -> Result<DeployConfig> {
    let config = DeployConfig {
        space_id: args.space.space_id.trim().to_string(),
        access_token: args.space.management_api_key.trim().to_string(),
        source_env_id: environment_id(&args.space.source_env_id, "SOURCE_ENV_ID")?,
        policy: branch_policy(&args.branch)?,
        migrations_dir: ci.migrations_dir(&args.migrations.migrations_dir),
        version_content_type: args.migrations.version_content_type.clone(),
        version_field: args.migrations.version_field.clone(),
        poll: PollSettings {
            interval: Duration::from_secs(args.poll_interval_secs),
            max_attempts: args.poll_max_attempts,
        },
        key_update_concurrency: args.key_update_concurrency,
        http_timeout: Duration::from_secs(args.space.http_timeout_secs),
    };
    config.validate().context("Invalid configuration")?;
    log::debug!("{:?}", config);
    Ok(config)
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
