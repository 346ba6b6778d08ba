use super::{build_facade, load_config, print_json, SourceArgs};
use crate::errors::AppResult;
use clap::Args;
use std::time::Duration;
use tracing::{error, info};

/// Append network-usage snapshots, once or on a fixed interval
#[derive(Args)]
pub struct MaterializeCommand {
    /// Seconds between snapshots (overrides config.toml)
    #[arg(long)]
    interval_seconds: Option<u64>,

    /// Write a single snapshot and exit
    #[arg(long)]
    once: bool,

    #[command(flatten)]
    sources: SourceArgs,
}

impl MaterializeCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = load_config();
        let facade = build_facade(&self.sources, &config)?;

        if self.once {
            let snapshot = facade.materialize_utilization_stats().await?;
            return print_json(&snapshot);
        }

        let interval_seconds = self
            .interval_seconds
            .unwrap_or(config.materialize.interval_seconds)
            .max(1);
        info!("Materialising network usage every {}s", interval_seconds);

        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A failed cycle is logged and retried on the next tick
                    if let Err(e) = facade.materialize_utilization_stats().await {
                        error!("Materialisation failed: {}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Stopping materialisation");
                    return Ok(());
                }
            }
        }
    }
}
