//! Error types for cfm-deploy

use cfm_core::CoreError;
use cfm_platform::PlatformError;
use thiserror::Error;

/// Deploy stage errors
#[derive(Error, Debug)]
pub enum DeployError {
    /// Configuration, naming, or migration discovery error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Platform call failed
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The target environment is not in a state migrations can run on (D001)
    #[error("[D001] Invalid state: {message}")]
    InvalidState { message: String },

    /// The platform reported the environment as failed (D002)
    #[error("[D002] Environment {environment} failed processing")]
    EnvironmentFailed { environment: String },

    /// The environment never became ready (D003)
    #[error("[D003] Environment {environment} not ready after {attempts} status checks (last status: {last_status})")]
    EnvironmentNotReady {
        environment: String,
        attempts: u32,
        last_status: String,
    },

    /// An API key could not be updated (D004)
    #[error("[D004] Failed to update API key {key}")]
    ApiKeyUpdate {
        key: String,
        #[source]
        source: PlatformError,
    },

    /// A migration script failed (D005)
    #[error("[D005] Migration {version} failed")]
    Migration {
        version: String,
        #[source]
        source: PlatformError,
    },
}

/// Result type alias for DeployError
pub type DeployResult<T> = Result<T, DeployError>;
