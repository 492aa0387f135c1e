//! Branch resolution from the CI trigger context.
//!
//! Push events carry the branch in `GITHUB_REF` (`refs/heads/<branch>`).
//! Pull-request events carry a synthetic merge ref (`refs/pull/<n>/merge`)
//! that does not name a real branch, so the head ref of the pull request is
//! used instead.

use crate::environment_id::BranchName;
use crate::error::{CoreError, CoreResult};
use serde::Deserialize;

const HEADS_PREFIX: &str = "refs/heads/";

/// The parts of a CI trigger that decide which branch a run belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerContext {
    /// Event name, e.g. `push` or `pull_request`
    pub event_name: String,

    /// The ref that triggered the run
    pub git_ref: Option<String>,

    /// Head branch of the pull request, for pull-request events
    pub pr_head_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    head: Option<HeadPayload>,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

impl TriggerContext {
    /// Build a context, pulling the pull-request head ref out of the raw
    /// event payload JSON when one is given.
    pub fn from_event_payload(
        event_name: impl Into<String>,
        git_ref: Option<String>,
        payload_path: &str,
        payload_json: &str,
    ) -> CoreResult<Self> {
        let payload: EventPayload =
            serde_json::from_str(payload_json).map_err(|e| CoreError::EventPayloadInvalid {
                path: payload_path.to_string(),
                message: e.to_string(),
            })?;
        let pr_head_ref = payload
            .pull_request
            .and_then(|pr| pr.head)
            .and_then(|head| head.git_ref);

        Ok(Self {
            event_name: event_name.into(),
            git_ref,
            pr_head_ref,
        })
    }

    /// Whether the run was triggered by a pull request.
    pub fn is_pull_request(&self) -> bool {
        matches!(
            self.event_name.as_str(),
            "pull_request" | "pull_request_target"
        )
    }

    /// The normalized branch this run belongs to, if one can be determined.
    pub fn branch(&self) -> Option<BranchName> {
        let raw = if self.is_pull_request() {
            log::debug!("Using pull request head ref {:?}", self.pr_head_ref);
            self.pr_head_ref.as_deref()
        } else {
            self.git_ref.as_deref()
        };
        normalize_branch(raw)
    }
}

/// Normalize a branch name for use in environment ids.
///
/// Strips a leading `refs/heads/` and replaces every `/` with `-`, so a
/// git-flow branch like `feat/foo-feature` becomes `feat-foo-feature`.
/// Absent or empty input yields `None`.
pub fn normalize_branch(raw: Option<&str>) -> Option<BranchName> {
    let raw = raw?;
    let stripped = raw.strip_prefix(HEADS_PREFIX).unwrap_or(raw);
    BranchName::try_new(stripped.replace('/', "-"))
}

#[cfg(test)]
#[path = "branch_test.rs"]
mod tests;
