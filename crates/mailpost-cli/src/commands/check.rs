//! `mailpost check` -- run a single ingestion cycle now.

use std::path::PathBuf;

use clap::Args;

use mailpost_core::orchestrator::CycleOutcome;

use super::{build_app, load_config};

#[derive(Args)]
pub struct CheckArgs {
    /// Config file path (default: ./mailpost.json).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let app = build_app(config);

    let outcome = app.run_cycle().await;
    match outcome {
        CycleOutcome::RateLimited => println!("skipped: checked too recently"),
        CycleOutcome::NotConfigured => println!("skipped: mailbox options not set"),
        CycleOutcome::Aborted => println!("aborted: see log"),
        CycleOutcome::NoMail => println!("no new mail"),
        CycleOutcome::Completed {
            processed,
            posted,
            failed,
        } => println!("processed {processed} message(s): {posted} posted, {failed} failed"),
    }
    Ok(())
}
