//! Resolve command implementation

use anyhow::Result;
use chrono::Utc;

use crate::cli::ResolveArgs;
use crate::context::{branch_policy, CiEnvironment};

/// Execute the resolve command
pub(crate) async fn execute(args: &ResolveArgs) -> Result<()> {
    let ci = CiEnvironment::from_env();
    let trigger = ci.trigger_context()?;
    let policy = branch_policy(&args.branch)?;
    let target = policy.resolve(&trigger, Utc::now())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&target)?);
        return Ok(());
    }

    println!(
        "branch:         {}",
        target.branch.as_ref().map(|b| b.as_str()).unwrap_or("-")
    );
    println!("classification: {}", target.classification);
    println!("environment:    {}", target.environment_id);
    Ok(())
}
