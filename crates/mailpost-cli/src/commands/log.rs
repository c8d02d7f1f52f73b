//! `mailpost log` -- print recent activity log entries.

use std::path::PathBuf;

use clap::Args;

use crate::store::FileCycleStore;

use super::load_config;

#[derive(Args)]
pub struct LogArgs {
    /// Config file path (default: ./mailpost.json).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum entries to print.
    #[arg(short = 'n', long, default_value_t = 20)]
    limit: usize,
}

pub async fn run(args: LogArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let store = FileCycleStore::new(config.state_path);

    let entries = store.recent_log(args.limit).await?;
    if entries.is_empty() {
        println!("log is empty");
        return Ok(());
    }
    for entry in entries {
        println!("{}  {}", entry.timestamp.format("%Y-%m-%d %H:%M:%S"), entry.message);
    }
    Ok(())
}
