//! cfm-platform - Content platform layer for cfm
//!
//! This crate provides the `ContentPlatform` and `MigrationExecutor` traits,
//! a reqwest-backed client for the Contentful Management API, and an
//! executor that shells out to the `contentful-migration` CLI.

pub mod contentful;
pub mod error;
pub mod executor;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod traits;
pub mod types;

pub use contentful::ContentfulClient;
pub use error::{PlatformError, PlatformResult};
pub use executor::CliMigrationExecutor;
#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryPlatform;
pub use traits::{ContentPlatform, MigrationExecutor, MigrationRequest};
pub use types::{ApiKey, Entry, Environment, EnvironmentAlias, EnvironmentStatus, Link, Locale};
