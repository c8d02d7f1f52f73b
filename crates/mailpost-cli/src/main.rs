//! `mailpost` -- scheduled mail-to-content ingestion.
//!
//! Subcommands:
//!
//! - `mailpost run` -- poll the mailbox on an interval until interrupted.
//! - `mailpost check` -- run a single ingestion cycle now.
//! - `mailpost log` -- print recent activity log entries.

use clap::{Parser, Subcommand};

mod commands;
mod sink;
mod spool;
mod store;

/// mailpost ingestion CLI.
#[derive(Parser)]
#[command(name = "mailpost", about = "mail-to-content ingestion", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Poll the mailbox on an interval until interrupted.
    Run(commands::run::RunArgs),

    /// Run a single ingestion cycle now.
    Check(commands::check::CheckArgs),

    /// Print recent activity log entries.
    Log(commands::log::LogArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await?,
        Commands::Check(args) => commands::check::run(args).await?,
        Commands::Log(args) => commands::log::run(args).await?,
    }

    Ok(())
}
