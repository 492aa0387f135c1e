//! Target environment naming.
//!
//! Decision order, first match wins:
//! 1. an explicit target environment id is used verbatim
//! 2. the production branch gets a fresh `master-YYYYMMDD-HHMM` (UTC) id
//! 3. the development branch gets the configured development id
//! 4. any other branch gets `GH-<branch>`

use crate::branch::{normalize_branch, TriggerContext};
use crate::environment_id::{BranchName, EnvironmentId};
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Prefix of the timestamped environments created for the production branch
pub const PRODUCTION_ENV_PREFIX: &str = "master-";

/// Prefix of the throwaway environments created for feature branches
pub const FEATURE_ENV_PREFIX: &str = "GH-";

/// How a run is classified from its branch and the configured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The configured production branch, no explicit target
    Production,
    /// The configured development branch, no explicit target
    Development,
    /// Any other branch, no explicit target
    Feature,
    /// An explicit target environment overrides the branch
    ExplicitTarget,
}

impl Classification {
    /// Feature runs always start from a fresh clone: any existing
    /// environment with the same id is deleted and a new one created.
    pub fn recreates_environment(self) -> bool {
        matches!(self, Classification::Feature)
    }

    /// Only production runs repoint the `master` alias.
    pub fn updates_alias(self) -> bool {
        matches!(self, Classification::Production)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Production => write!(f, "production"),
            Classification::Development => write!(f, "development"),
            Classification::Feature => write!(f, "feature"),
            Classification::ExplicitTarget => write!(f, "explicit-target"),
        }
    }
}

/// Branch names and environment ids that drive classification.
#[derive(Debug, Clone)]
pub struct BranchPolicy {
    /// Normalized production branch name
    pub production_branch: Option<BranchName>,

    /// Normalized development branch name
    pub development_branch: Option<BranchName>,

    /// Environment reused by every development-branch run
    pub development_env_id: EnvironmentId,

    /// Explicit override; wins over everything else
    pub target_env_id: Option<EnvironmentId>,
}

/// The outcome of naming: which branch, how it was classified, and the
/// environment the run will operate on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// Normalized branch, if the trigger named one
    pub branch: Option<BranchName>,

    /// Classification of the run
    pub classification: Classification,

    /// Target environment id
    pub environment_id: EnvironmentId,
}

impl BranchPolicy {
    /// Build a policy from raw configured branch names, normalizing them the
    /// same way trigger branches are normalized.
    pub fn new(
        production_branch: &str,
        development_branch: &str,
        development_env_id: EnvironmentId,
        target_env_id: Option<EnvironmentId>,
    ) -> Self {
        Self {
            production_branch: normalize_branch(Some(production_branch)),
            development_branch: normalize_branch(Some(development_branch)),
            development_env_id,
            target_env_id,
        }
    }

    /// Classify a normalized branch. Never fails; an unknown branch is a
    /// feature branch.
    pub fn classify(&self, branch: Option<&BranchName>) -> Classification {
        if self.target_env_id.is_some() {
            return Classification::ExplicitTarget;
        }
        match branch {
            Some(b) if self.production_branch.as_ref() == Some(b) => Classification::Production,
            Some(b) if self.development_branch.as_ref() == Some(b) => Classification::Development,
            _ => Classification::Feature,
        }
    }

    /// Resolve the target environment for a trigger at the given time.
    pub fn resolve(
        &self,
        trigger: &TriggerContext,
        now: DateTime<Utc>,
    ) -> CoreResult<ResolvedTarget> {
        let branch = trigger.branch();
        let classification = self.classify(branch.as_ref());

        let environment_id = match classification {
            Classification::ExplicitTarget => match &self.target_env_id {
                Some(id) => id.clone(),
                None => {
                    return Err(CoreError::ConfigInvalid {
                        message: "explicit target classification without a target id".to_string(),
                    })
                }
            },
            Classification::Production => production_environment_id(now),
            Classification::Development => self.development_env_id.clone(),
            Classification::Feature => match &branch {
                Some(b) => feature_environment_id(b),
                None => {
                    return Err(CoreError::BranchUnresolved {
                        event: trigger.event_name.clone(),
                    })
                }
            },
        };

        log::debug!(
            "Resolved branch {:?} as {} -> {}",
            branch.as_ref().map(BranchName::as_str),
            classification,
            environment_id
        );

        Ok(ResolvedTarget {
            branch,
            classification,
            environment_id,
        })
    }
}

/// `master-YYYYMMDD-HHMM` in UTC; hours and minutes are always two digits.
pub fn production_environment_id(now: DateTime<Utc>) -> EnvironmentId {
    EnvironmentId::prefixed(PRODUCTION_ENV_PREFIX, now.format("%Y%m%d-%H%M"))
}

/// `GH-<branch>`
pub fn feature_environment_id(branch: &BranchName) -> EnvironmentId {
    EnvironmentId::prefixed(FEATURE_ENV_PREFIX, branch)
}

#[cfg(test)]
#[path = "naming_test.rs"]
mod tests;
