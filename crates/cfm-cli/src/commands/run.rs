//! Run command implementation

use anyhow::{Context, Result};
use cfm_deploy::{AliasOutcome, Deployment};
use cfm_platform::{CliMigrationExecutor, ContentPlatform, ContentfulClient, MigrationExecutor};
use chrono::Utc;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::context::{deploy_config, CiEnvironment};
use crate::outputs;

/// Execute the run command
pub(crate) async fn execute(args: &RunArgs) -> Result<()> {
    let ci = CiEnvironment::from_env();
    let config = deploy_config(args, &ci)?;
    let trigger = ci.trigger_context()?;

    let platform: Arc<dyn ContentPlatform> = Arc::new(
        ContentfulClient::new(
            &args.space.api_url,
            config.space_id.clone(),
            config.access_token.clone(),
            config.http_timeout,
        )
        .context("Failed to create Contentful client")?,
    );
    let executor: Arc<dyn MigrationExecutor> = Arc::new(
        CliMigrationExecutor::from_command(&args.migrations.migration_command)
            .context("MIGRATION_COMMAND must not be empty")?,
    );

    let deployment =
        Deployment::new(config, platform, executor).with_app_url(args.space.app_url.as_str());
    let outcome = deployment.run(&trigger, Utc::now()).await?;

    println!(
        "Environment {} ready: {}",
        outcome.environment_name(),
        outcome.environment_url
    );
    if !outcome.migrations.applied.is_empty() {
        println!(
            "Applied {} migration(s), now at version {}",
            outcome.migrations.applied.len(),
            outcome.migrations.current_version()
        );
    }
    if let Some(alias @ AliasOutcome::Failed { .. }) = &outcome.alias {
        println!("Warning: {}", alias);
    }

    outputs::write_outputs(
        ci.output.as_deref(),
        &[
            ("environment_url", outcome.environment_url.as_str()),
            ("environment_name", outcome.environment_name()),
        ],
    )?;
    if let Some(path) = &ci.step_summary {
        outputs::append_step_summary(path, &outputs::render_summary(&outcome))?;
    }

    Ok(())
}
