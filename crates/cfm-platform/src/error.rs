//! Error types for cfm-platform

use thiserror::Error;

/// Content platform operation errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Resource not found (P001)
    #[error("[P001] Not found: {resource}")]
    NotFound { resource: String },

    /// Non-success HTTP response (P002)
    #[error("[P002] {resource} failed with HTTP {status}: {message}")]
    Http {
        resource: String,
        status: u16,
        message: String,
    },

    /// Transport failure before a response arrived (P003)
    #[error("[P003] Request to {resource} failed: {message}")]
    Transport { resource: String, message: String },

    /// Response body could not be decoded (P004)
    #[error("[P004] Invalid response from {resource}: {message}")]
    Decode { resource: String, message: String },

    /// Resource is missing data needed for the operation (P005)
    #[error("[P005] Invalid resource {resource}: {message}")]
    InvalidResource { resource: String, message: String },

    /// Migration process could not be started (P006)
    #[error("[P006] Failed to start migration command '{program}'")]
    MigrationSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Migration process exited unsuccessfully (P007)
    #[error("[P007] Migration {file} failed (exit {exit_code}): {stderr}")]
    MigrationFailed {
        file: String,
        exit_code: i32,
        stderr: String,
    },

    /// HTTP client construction failed (P008)
    #[error("[P008] HTTP client setup failed: {0}")]
    ClientSetup(String),
}

impl PlatformError {
    /// Whether the error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound { .. })
    }
}

/// Result type alias for PlatformError
pub type PlatformResult<T> = Result<T, PlatformError>;
