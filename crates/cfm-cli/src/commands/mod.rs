//! CLI command implementations

pub(crate) mod pending;
pub(crate) mod resolve;
pub(crate) mod run;
