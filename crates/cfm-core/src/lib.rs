//! cfm-core - Core library for cfm
//!
//! This crate holds the platform-independent pieces of the deploy step:
//! branch resolution from the CI trigger, target environment naming,
//! migration file discovery and ordering, and the immutable run
//! configuration shared by every stage.

pub mod branch;
pub mod config;
pub mod environment_id;
pub mod error;
pub mod migration;
pub mod naming;
mod newtype_string;

pub use branch::{normalize_branch, TriggerContext};
pub use config::{DeployConfig, PollSettings};
pub use environment_id::{BranchName, EnvironmentId};
pub use error::{CoreError, CoreResult};
pub use migration::{
    discover_migrations, file_of_version, pending_after, version_of_file, MigrationFile,
    MigrationVersion,
};
pub use naming::{BranchPolicy, Classification, ResolvedTarget};
