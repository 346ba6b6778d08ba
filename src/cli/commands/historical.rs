use super::{build_facade, load_config, print_json, SourceArgs};
use crate::errors::AppResult;
use crate::stats::HistoricalMetric;
use crate::types::ChartDuration;
use clap::Args;
use tracing::info;

/// Print one historical series as JSON
#[derive(Args)]
pub struct HistoricalCommand {
    /// Series to compute
    #[arg(value_enum)]
    metric: HistoricalMetric,

    /// Chart span
    #[arg(long, value_enum, default_value_t = ChartDuration::Month)]
    duration: ChartDuration,

    #[command(flatten)]
    sources: SourceArgs,
}

impl HistoricalCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = load_config();
        let facade = build_facade(&self.sources, &config)?;

        let points = facade.historical(self.metric, self.duration).await?;
        info!(
            "Computed {} series over {}: {} points",
            self.metric,
            self.duration,
            points.len()
        );
        print_json(&points)
    }
}
