//! Pending command implementation

use anyhow::Result;
use cfm_core::{discover_migrations, pending_after};

use crate::cli::PendingArgs;
use crate::context::CiEnvironment;

/// Execute the pending command
pub(crate) async fn execute(args: &PendingArgs) -> Result<()> {
    let dir = CiEnvironment::from_env().migrations_dir(&args.migrations_dir);
    let available = discover_migrations(&dir)?;
    let pending = pending_after(&available, &args.current)?;

    if pending.is_empty() {
        println!("No migrations pending after {}", args.current);
        return Ok(());
    }

    println!("{} migration(s) pending after {}:", pending.len(), args.current);
    for migration in pending {
        println!("  {}  {}", migration.version.as_str(), migration.path.display());
    }
    Ok(())
}
