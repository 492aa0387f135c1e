//! Migration file discovery and ordering.
//!
//! Migration scripts live directly under the migrations directory and are
//! named after the version they migrate to, with dots written as
//! underscores: version `3.2` lives in `3_2.js`. Files that do not match the
//! numeric naming scheme are ignored.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const MIGRATION_EXTENSION: &str = ".js";

static MIGRATION_FILE_RE: OnceLock<Regex> = OnceLock::new();

fn migration_file_re() -> &'static Regex {
    MIGRATION_FILE_RE.get_or_init(|| Regex::new(r"^\d+(?:_\d+)*\.js$").expect("valid regex"))
}

/// Whether a file name follows the numeric migration naming scheme.
pub fn is_migration_file(file_name: &str) -> bool {
    migration_file_re().is_match(file_name)
}

/// `3_2.js` -> `3.2`
pub fn version_of_file(file_name: &str) -> String {
    file_name
        .strip_suffix(MIGRATION_EXTENSION)
        .unwrap_or(file_name)
        .replace('_', ".")
}

/// `3.2` -> `3_2.js`
pub fn file_of_version(version: &str) -> String {
    format!("{}{}", version.replace('.', "_"), MIGRATION_EXTENSION)
}

/// A dotted numeric migration version.
///
/// Equality is on the exact string (so `"01"` and `"1"` are different
/// versions), ordering is numeric component by component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MigrationVersion {
    raw: String,
    #[serde(skip)]
    components: Vec<u64>,
}

impl MigrationVersion {
    /// Parse a dotted numeric version, returning `None` if any component is
    /// not a number.
    pub fn parse(raw: &str) -> Option<Self> {
        let components = raw
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            raw: raw.to_string(),
            components,
        })
    }

    /// The version exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The file name holding this migration.
    pub fn file_name(&self) -> String {
        file_of_version(&self.raw)
    }
}

impl Ord for MigrationVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components
            .cmp(&other.components)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for MigrationVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A migration script found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFile {
    /// Version the script migrates to
    pub version: MigrationVersion,

    /// Absolute or workspace-relative path to the script
    pub path: PathBuf,
}

/// List the migrations in `dir`, sorted by ascending numeric version.
///
/// Directory listing order is not relied on.
pub fn discover_migrations(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    let unreadable = |source| CoreError::MigrationsDirUnreadable {
        path: dir.display().to_string(),
        source,
    };

    let mut migrations = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !is_migration_file(name) || !entry.path().is_file() {
            log::debug!("Skipping non-migration file {}", name);
            continue;
        }
        let Some(version) = MigrationVersion::parse(&version_of_file(name)) else {
            log::warn!("Skipping migration with unparseable version: {}", name);
            continue;
        };
        migrations.push(MigrationFile {
            path: dir.join(version.file_name()),
            version,
        });
    }

    migrations.sort_by(|a, b| a.version.cmp(&b.version));
    Ok(migrations)
}

/// The migrations strictly after `current`, in order.
///
/// `current` must exactly match one of the available versions.
pub fn pending_after<'a>(
    available: &'a [MigrationFile],
    current: &str,
) -> CoreResult<&'a [MigrationFile]> {
    let index = available
        .iter()
        .position(|m| m.version.as_str() == current)
        .ok_or_else(|| CoreError::VersionMismatch {
            version: current.to_string(),
        })?;
    Ok(&available[index + 1..])
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
