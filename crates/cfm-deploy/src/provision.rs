//! Environment provisioning and readiness polling.

use crate::error::{DeployError, DeployResult};
use cfm_core::{Classification, EnvironmentId, PollSettings};
use cfm_platform::{ContentPlatform, Environment, EnvironmentStatus};

/// Make sure the target environment exists and is ready.
///
/// Feature runs always start from a fresh clone of `source`: an existing
/// environment with the same id is deleted first. Other runs reuse the
/// environment when it exists and create it from `source` when the lookup
/// reports it missing (a production run's timestamped id is new by
/// construction). Lookup failures other than not-found are logged and
/// tolerated; the readiness poll surfaces them if they persist.
pub async fn provision_environment(
    platform: &dyn ContentPlatform,
    target: &EnvironmentId,
    source: &EnvironmentId,
    classification: Classification,
    poll: PollSettings,
) -> DeployResult<Environment> {
    log::info!("Checking for existing versions of environment: {}", target);

    let missing = match platform.get_environment(target).await {
        Ok(_) if classification.recreates_environment() => {
            platform.delete_environment(target).await?;
            log::info!("Environment deleted");
            true
        }
        Ok(_) => {
            log::info!("Reusing environment {}", target);
            false
        }
        Err(e) if e.is_not_found() => {
            log::info!("Environment not found");
            true
        }
        Err(e) => {
            log::warn!("Environment lookup failed, continuing: {}", e);
            false
        }
    };

    if classification.recreates_environment() || missing {
        log::info!("Creating environment {} from {}", target, source);
        platform.create_environment(target, source).await?;
    }

    wait_until_ready(platform, target, poll).await
}

/// Poll the environment's status until it is `ready`.
///
/// A `failed` status and running out of attempts are both errors.
pub async fn wait_until_ready(
    platform: &dyn ContentPlatform,
    id: &EnvironmentId,
    poll: PollSettings,
) -> DeployResult<Environment> {
    log::info!("Waiting for environment processing...");

    let mut last_status = EnvironmentStatus::Queued;
    for attempt in 1..=poll.max_attempts {
        let environment = platform.get_environment(id).await?;
        last_status = environment.status();
        log::debug!(
            "Environment {} status {} (check {}/{})",
            id,
            last_status,
            attempt,
            poll.max_attempts
        );

        match last_status {
            EnvironmentStatus::Ready => {
                log::info!("Successfully processed new environment ({})", id);
                return Ok(environment);
            }
            EnvironmentStatus::Failed => {
                log::error!("Environment creation failed");
                return Err(DeployError::EnvironmentFailed {
                    environment: id.to_string(),
                });
            }
            _ => {}
        }

        if attempt < poll.max_attempts {
            tokio::time::sleep(poll.interval).await;
        }
    }

    Err(DeployError::EnvironmentNotReady {
        environment: id.to_string(),
        attempts: poll.max_attempts,
        last_status: last_status.to_string(),
    })
}

#[cfg(test)]
#[path = "provision_test.rs"]
mod tests;
