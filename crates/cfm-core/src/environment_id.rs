//! Strongly-typed identifiers for environments and branches.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Identifier of an environment on the content platform.
    ///
    /// Keeps environment ids from being mixed up with space ids, alias ids,
    /// or raw branch names.
    pub struct EnvironmentId;
}

define_newtype_string! {
    /// A normalized git branch name (no `refs/heads/` prefix, no `/`).
    pub struct BranchName;
}

impl EnvironmentId {
    /// Join a non-empty prefix and a suffix; the result is never empty.
    pub(crate) fn prefixed(prefix: &'static str, suffix: impl std::fmt::Display) -> Self {
        debug_assert!(!prefix.is_empty());
        Self(format!("{prefix}{suffix}"))
    }
}

#[cfg(test)]
#[path = "environment_id_test.rs"]
mod tests;
