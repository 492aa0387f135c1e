//! Immutable run configuration.
//!
//! Built once at entry from CLI flags and environment variables, then passed
//! by reference to each stage.

use crate::environment_id::EnvironmentId;
use crate::error::{CoreError, CoreResult};
use crate::naming::BranchPolicy;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default environment new feature environments are cloned from
pub const DEFAULT_SOURCE_ENV_ID: &str = "master";

/// Default content type holding the version marker
pub const DEFAULT_VERSION_CONTENT_TYPE: &str = "versionTracking";

/// Default field of the version marker holding the version string
pub const DEFAULT_VERSION_FIELD: &str = "version";

/// Alias repointed on production runs
pub const PRODUCTION_ALIAS_ID: &str = "master";

/// Readiness polling schedule for a freshly created environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between status checks
    pub interval: Duration,

    /// Maximum number of status checks
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 10,
        }
    }
}

/// Everything a deploy run needs to know, fixed for the run's duration.
#[derive(Clone)]
pub struct DeployConfig {
    /// Space the environments live in
    pub space_id: String,

    /// Management API token
    pub access_token: String,

    /// Environment feature environments are cloned from
    pub source_env_id: EnvironmentId,

    /// Branch classification policy
    pub policy: BranchPolicy,

    /// Directory holding the migration scripts
    pub migrations_dir: PathBuf,

    /// Content type of the version marker entry
    pub version_content_type: String,

    /// Field of the version marker entry holding the version
    pub version_field: String,

    /// Environment readiness polling
    pub poll: PollSettings,

    /// Upper bound on concurrent API key updates
    pub key_update_concurrency: usize,

    /// Timeout applied to each Management API request
    pub http_timeout: Duration,
}

impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("space_id", &self.space_id)
            .field("access_token", &"<redacted>")
            .field("source_env_id", &self.source_env_id)
            .field("policy", &self.policy)
            .field("migrations_dir", &self.migrations_dir)
            .field("version_content_type", &self.version_content_type)
            .field("version_field", &self.version_field)
            .field("poll", &self.poll)
            .field("key_update_concurrency", &self.key_update_concurrency)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl DeployConfig {
    /// Reject configurations no run could succeed with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.space_id.trim().is_empty() {
            return Err(invalid("SPACE_ID must not be empty"));
        }
        if self.access_token.trim().is_empty() {
            return Err(invalid("MANAGEMENT_API_KEY must not be empty"));
        }
        if self.version_content_type.is_empty() || self.version_field.is_empty() {
            return Err(invalid("version content type and field must not be empty"));
        }
        if self.poll.max_attempts == 0 {
            return Err(invalid("poll attempts must be at least 1"));
        }
        if self.key_update_concurrency == 0 {
            return Err(invalid("key update concurrency must be at least 1"));
        }
        if self.http_timeout.is_zero() {
            return Err(invalid("HTTP_TIMEOUT_SECS must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::ConfigInvalid {
        message: message.to_string(),
    }
}

/// Resolve the migrations directory against the checkout root.
///
/// Absolute paths are used as-is.
pub fn resolve_migrations_dir(workspace: Option<&Path>, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    match workspace {
        Some(root) if dir.is_relative() => root.join(dir),
        _ => dir.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
