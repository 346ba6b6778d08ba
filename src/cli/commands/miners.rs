use super::{build_facade, load_config, print_json, SourceArgs};
use crate::errors::AppResult;
use clap::Args;

/// Print live participants reconciled against the block index as JSON
#[derive(Args)]
pub struct MinersCommand {
    #[command(flatten)]
    sources: SourceArgs,
}

impl MinersCommand {
    pub async fn run(&self) -> AppResult<()> {
        let config = load_config();
        let facade = build_facade(&self.sources, &config)?;
        print_json(&facade.get_miner_stats().await?)
    }
}
