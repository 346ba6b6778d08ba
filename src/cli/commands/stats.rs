use super::{build_facade, load_config, print_json, SourceArgs};
use crate::errors::AppResult;
use clap::Args;
use tracing::info;

/// Print the complete storage statistics aggregate as JSON
#[derive(Args)]
pub struct StatsCommand {
    #[command(flatten)]
    sources: SourceArgs,
}

impl StatsCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = load_config();
        let facade = build_facade(&self.sources, &config)?;

        let stats = facade.get_stats().await?;
        info!(
            "Computed storage stats: {} miners, {} histogram buckets",
            stats.miners.len(),
            stats.capacity_histogram.len()
        );
        print_json(&stats)
    }
}
