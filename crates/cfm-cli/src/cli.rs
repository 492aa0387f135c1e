//! CLI argument definitions using clap derive API
//!
//! Every option can also be supplied through the environment variable named
//! next to it, which is how the CI workflow configures the step.

use cfm_core::config::{
    DEFAULT_SOURCE_ENV_ID, DEFAULT_VERSION_CONTENT_TYPE, DEFAULT_VERSION_FIELD,
};
use cfm_deploy::DEFAULT_APP_URL;
use cfm_platform::contentful::DEFAULT_API_URL;
use cfm_platform::executor::DEFAULT_MIGRATION_COMMAND;
use clap::{Args, Parser, Subcommand};

/// cfm - Contentful branch environments and migrations for CI
#[derive(Parser, Debug)]
#[command(name = "cfm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the branch environment, grant API key access, run pending
    /// migrations, and repoint the master alias on production
    Run(RunArgs),

    /// Print the branch, classification, and environment id for this run
    Resolve(ResolveArgs),

    /// List the migrations that would run after a given version
    Pending(PendingArgs),
}

/// Space and API connection settings
#[derive(Args, Debug, Clone)]
pub struct SpaceArgs {
    /// Contentful space id
    #[arg(long, env = "SPACE_ID")]
    pub space_id: String,

    /// Content Management API token
    #[arg(long, env = "MANAGEMENT_API_KEY", hide_env_values = true)]
    pub management_api_key: String,

    /// Environment feature environments are cloned from
    #[arg(long, env = "SOURCE_ENV_ID", default_value = DEFAULT_SOURCE_ENV_ID)]
    pub source_env_id: String,

    /// Content Management API base URL
    #[arg(long, env = "CONTENTFUL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Web app base URL used for the environment link
    #[arg(long, env = "CONTENTFUL_APP_URL", default_value = DEFAULT_APP_URL)]
    pub app_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,
}

/// Branch classification settings
#[derive(Args, Debug, Clone)]
pub struct BranchArgs {
    /// Branch whose runs create timestamped production environments
    #[arg(long, env = "GH_PROD_BRANCH", default_value = "production")]
    pub prod_branch: String,

    /// Branch whose runs reuse the development environment
    #[arg(long, env = "GH_DEV_BRANCH", default_value = "develop")]
    pub dev_branch: String,

    /// Environment id used for the development branch
    #[arg(long, env = "DEV_ENV_ID", default_value = "dev")]
    pub dev_env_id: String,

    /// Explicit target environment, overriding branch classification
    #[arg(long, env = "TARGET_ENV_ID")]
    pub target_env_id: Option<String>,
}

/// Migration discovery and execution settings
#[derive(Args, Debug, Clone)]
pub struct MigrationArgs {
    /// Migrations directory, relative to GITHUB_WORKSPACE when set
    #[arg(long, env = "MIGRATIONS_DIR", default_value = "migrations")]
    pub migrations_dir: String,

    /// Content type of the version marker entry
    #[arg(long, env = "VERSION_CONTENT_TYPE", default_value = DEFAULT_VERSION_CONTENT_TYPE)]
    pub version_content_type: String,

    /// Field of the version marker entry holding the version
    #[arg(long, env = "VERSION_FIELD", default_value = DEFAULT_VERSION_FIELD)]
    pub version_field: String,

    /// Command that applies a single migration script
    #[arg(long, env = "MIGRATION_COMMAND", default_value = DEFAULT_MIGRATION_COMMAND)]
    pub migration_command: String,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub space: SpaceArgs,

    #[command(flatten)]
    pub branch: BranchArgs,

    #[command(flatten)]
    pub migrations: MigrationArgs,

    /// Seconds between environment status checks
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 3)]
    pub poll_interval_secs: u64,

    /// Status checks before giving up on the environment
    #[arg(long, env = "POLL_MAX_ATTEMPTS", default_value_t = 10)]
    pub poll_max_attempts: u32,

    /// Maximum concurrent API key updates
    #[arg(long, env = "KEY_UPDATE_CONCURRENCY", default_value_t = 4)]
    pub key_update_concurrency: usize,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub branch: BranchArgs,

    /// Print the resolution as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the pending command
#[derive(Args, Debug)]
pub struct PendingArgs {
    /// Version currently recorded in the environment
    #[arg(long)]
    pub current: String,

    /// Migrations directory, relative to GITHUB_WORKSPACE when set
    #[arg(long, env = "MIGRATIONS_DIR", default_value = "migrations")]
    pub migrations_dir: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
