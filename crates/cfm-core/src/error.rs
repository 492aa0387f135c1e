//! Error types for cfm-core

use thiserror::Error;

/// Core error type for cfm
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: A configuration value is missing or unusable
    #[error("[C001] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C002: The CI trigger did not identify a branch
    #[error("[C002] Cannot determine the branch for event '{event}'; set TARGET_ENV_ID to pick an environment explicitly")]
    BranchUnresolved { event: String },

    /// C003: The migrations directory could not be read
    #[error("[C003] Cannot read migrations directory {path}")]
    MigrationsDirUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// C004: The stored version does not match any migration on disk
    #[error("[C004] Version {version} is not matching with any known migration")]
    VersionMismatch { version: String },

    /// C005: The CI event payload could not be parsed
    #[error("[C005] Failed to parse event payload {path}: {message}")]
    EventPayloadInvalid { path: String, message: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
