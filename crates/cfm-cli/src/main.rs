//! cfm - Contentful branch environments and content migrations for CI

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod commands;
mod context;
mod outputs;

use cli::Cli;
use commands::{pending, resolve, run};

/// Install the log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("logging init failed: {}", e);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Run(args) => run::execute(args).await,
        cli::Commands::Resolve(args) => resolve::execute(args).await,
        cli::Commands::Pending(args) => pending::execute(args).await,
    };

    if let Err(err) = result {
        eprintln!("{}", outputs::error_annotation(&err));
        std::process::exit(1);
    }
}
