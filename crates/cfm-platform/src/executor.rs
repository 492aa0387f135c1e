//! Migration execution via the `contentful-migration` CLI.
//!
//! Each script runs as a separate process. The process receives the space,
//! environment and token as flags and the script path as its last argument.
//! A non-zero exit is a failed migration.

use crate::error::{PlatformError, PlatformResult};
use crate::traits::{MigrationExecutor, MigrationRequest};
use async_trait::async_trait;
use std::process::Stdio;

/// Default command used to run migration scripts
pub const DEFAULT_MIGRATION_COMMAND: &str = "contentful-migration";

/// Runs migrations by spawning an external command.
#[derive(Debug, Clone)]
pub struct CliMigrationExecutor {
    program: String,
    leading_args: Vec<String>,
}

impl CliMigrationExecutor {
    /// Build from a whitespace-separated command line such as
    /// `npx contentful-migration`. Returns `None` for a blank command.
    pub fn from_command(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            leading_args: parts.collect(),
        })
    }

    /// Program that will be spawned.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for a request, after the program name.
    pub fn build_args(&self, request: &MigrationRequest) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.extend([
            "--space-id".to_string(),
            request.space_id.clone(),
            "--environment-id".to_string(),
            request.environment_id.to_string(),
            "--access-token".to_string(),
            request.access_token.clone(),
        ]);
        if request.yes {
            args.push("--yes".to_string());
        }
        args.push(request.file_path.display().to_string());
        args
    }
}

impl Default for CliMigrationExecutor {
    fn default() -> Self {
        Self {
            program: DEFAULT_MIGRATION_COMMAND.to_string(),
            leading_args: Vec::new(),
        }
    }
}

#[async_trait]
impl MigrationExecutor for CliMigrationExecutor {
    async fn run_migration(&self, request: &MigrationRequest) -> PlatformResult<()> {
        let file = request.file_path.display().to_string();
        log::debug!("Spawning {} for {}", self.program, file);

        let output = tokio::process::Command::new(&self.program)
            .args(self.build_args(request))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| PlatformError::MigrationSpawn {
                program: self.program.clone(),
                source,
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::info!("[migration] {}", line);
        }

        if !output.status.success() {
            return Err(PlatformError::MigrationFailed {
                file,
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
