//! `mailpost run` -- scheduled polling until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{build_app, load_config};

#[derive(Args)]
pub struct RunArgs {
    /// Config file path (default: ./mailpost.json).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run one cycle immediately instead of waiting a full interval.
    #[arg(long)]
    immediate: bool,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref()).await?;
    let interval_secs = config.check_interval_secs;
    let app = build_app(config);

    info!(interval_secs, "mailpost scheduler starting");

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    if !args.immediate {
        // Skip the immediate first tick; the next one fires after a
        // full interval, matching a freshly armed schedule.
        interval.tick().await;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("mailpost scheduler shutting down");
                return Ok(());
            }
            _ = interval.tick() => {
                let outcome = app.run_cycle().await;
                debug!(?outcome, "cycle finished");
            }
        }
    }
}
