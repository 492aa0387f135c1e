//! cfm-deploy - Deploy stages for cfm
//!
//! Each stage is a free function over a `ContentPlatform`; `Deployment`
//! wires them together in their fixed order: resolve, provision, grant API
//! key access, migrate, and (production only) repoint the alias.

pub mod access;
pub mod alias;
pub mod error;
pub mod migrate;
pub mod pipeline;
pub mod provision;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use access::{grant_api_key_access, AccessReport};
pub use alias::{update_alias, AliasOutcome};
pub use error::{DeployError, DeployResult};
pub use migrate::{run_pending_migrations, MigrationReport};
pub use pipeline::{environment_url, DeployOutcome, Deployment, DEFAULT_APP_URL};
pub use provision::{provision_environment, wait_until_ready};
