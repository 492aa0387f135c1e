//! Platform trait definitions

use crate::error::PlatformResult;
use crate::types::{ApiKey, Entry, Environment, EnvironmentAlias, Locale};
use async_trait::async_trait;
use cfm_core::EnvironmentId;
use std::fmt;
use std::path::PathBuf;

/// Space-scoped content platform operations used by the deploy stages.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait ContentPlatform: Send + Sync {
    /// Id of the space this handle operates on
    fn space_id(&self) -> &str;

    /// Fetch an environment; `PlatformError::NotFound` if it does not exist
    async fn get_environment(&self, id: &EnvironmentId) -> PlatformResult<Environment>;

    /// Delete an environment
    async fn delete_environment(&self, id: &EnvironmentId) -> PlatformResult<()>;

    /// Create an environment with a fixed id, cloned from `source`
    async fn create_environment(
        &self,
        id: &EnvironmentId,
        source: &EnvironmentId,
    ) -> PlatformResult<Environment>;

    /// All delivery API keys of the space
    async fn list_api_keys(&self) -> PlatformResult<Vec<ApiKey>>;

    /// Persist an API key, returning the stored version
    async fn update_api_key(&self, key: &ApiKey) -> PlatformResult<ApiKey>;

    /// Locales of an environment
    async fn list_locales(&self, env: &EnvironmentId) -> PlatformResult<Vec<Locale>>;

    /// All entries of one content type in an environment
    async fn list_entries(&self, env: &EnvironmentId, content_type: &str)
        -> PlatformResult<Vec<Entry>>;

    /// Persist an entry's fields, returning the stored version
    async fn update_entry(&self, env: &EnvironmentId, entry: &Entry) -> PlatformResult<Entry>;

    /// Publish the current version of an entry
    async fn publish_entry(&self, env: &EnvironmentId, entry: &Entry) -> PlatformResult<Entry>;

    /// Fetch an environment alias
    async fn get_alias(&self, alias_id: &str) -> PlatformResult<EnvironmentAlias>;

    /// Persist an environment alias
    async fn update_alias(&self, alias: &EnvironmentAlias) -> PlatformResult<EnvironmentAlias>;
}

/// Options for a single migration script run.
#[derive(Clone, PartialEq, Eq)]
pub struct MigrationRequest {
    pub space_id: String,
    pub environment_id: EnvironmentId,
    pub access_token: String,
    /// Skip the interactive confirmation prompt
    pub yes: bool,
    pub file_path: PathBuf,
}

impl fmt::Debug for MigrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationRequest")
            .field("space_id", &self.space_id)
            .field("environment_id", &self.environment_id)
            .field("access_token", &"<redacted>")
            .field("yes", &self.yes)
            .field("file_path", &self.file_path)
            .finish()
    }
}

/// Runs one migration script against an environment.
#[async_trait]
pub trait MigrationExecutor: Send + Sync {
    /// Run the script; an error means the migration did not complete
    async fn run_migration(&self, request: &MigrationRequest) -> PlatformResult<()>;
}
