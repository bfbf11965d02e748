//! Anacomus - Main Entry Point
//!
//! Runs the isolation-forest contamination sweeps from the command line.

use anacomus::cli::{cmd_all, cmd_run, cmd_show, Cli, Commands};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anacomus=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { scenario }) => cmd_run(scenario, &cli.sweep)?,
        Some(Commands::Show { scenario }) => cmd_show(scenario, &cli.sweep)?,
        // No subcommand runs every scenario, like `all`
        Some(Commands::All) | None => cmd_all(&cli.sweep)?,
    }

    Ok(())
}
