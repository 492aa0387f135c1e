//! Step outputs and job summary for GitHub Actions

use anyhow::{Context, Result};
use cfm_deploy::{AliasOutcome, DeployOutcome};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append `name=value` lines to the outputs file, or print them to stdout
/// when the runner did not provide one.
pub(crate) fn write_outputs(path: Option<&Path>, outputs: &[(&str, &str)]) -> Result<()> {
    let mut lines = String::new();
    for (name, value) in outputs {
        let _ = writeln!(lines, "{}={}", name, value);
    }

    match path {
        Some(path) => append(path, &lines),
        None => {
            print!("{}", lines);
            Ok(())
        }
    }
}

/// Append markdown to the job summary file.
pub(crate) fn append_step_summary(path: &Path, markdown: &str) -> Result<()> {
    append(path, markdown)
}

fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Escape a workflow command's data so it stays on one line.
pub(crate) fn escape_workflow_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// The `::error::` workflow command reporting a failed run.
pub(crate) fn error_annotation(err: &anyhow::Error) -> String {
    format!("::error::{}", escape_workflow_data(&format!("{:#}", err)))
}

/// Render the markdown job summary for a finished run.
pub(crate) fn render_summary(outcome: &DeployOutcome) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "### Contentful environment `{}`\n", outcome.environment_name());
    let _ = writeln!(md, "| | |");
    let _ = writeln!(md, "|---|---|");
    if let Some(branch) = &outcome.target.branch {
        let _ = writeln!(md, "| Branch | `{}` |", branch);
    }
    let _ = writeln!(md, "| Classification | {} |", outcome.target.classification);
    let _ = writeln!(
        md,
        "| Environment | [{}]({}) |",
        outcome.environment_name(),
        outcome.environment_url
    );
    let _ = writeln!(
        md,
        "| API keys | {} updated, {} unchanged |",
        outcome.access.updated.len(),
        outcome.access.unchanged.len()
    );

    let migrations = &outcome.migrations;
    if migrations.applied.is_empty() {
        let _ = writeln!(
            md,
            "| Migrations | none pending (at {}) |",
            migrations.current_version()
        );
    } else {
        let _ = writeln!(
            md,
            "| Migrations | {} -> {} ({}) |",
            migrations.previous_version,
            migrations.current_version(),
            migrations.applied.join(", ")
        );
    }

    match &outcome.alias {
        Some(AliasOutcome::Updated { alias, environment }) => {
            let _ = writeln!(md, "| Alias | `{}` -> `{}` |", alias, environment);
        }
        Some(AliasOutcome::Failed { alias, message }) => {
            let _ = writeln!(md, "| Alias | `{}` not updated: {} |", alias, message);
        }
        None => {}
    }
    md.push('\n');
    md
}

#[cfg(test)]
#[path = "outputs_test.rs"]
mod tests;
