use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use degree_stats::{datasets::process_root, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_env())
        .init();

    let summary = process_root(&config)
        .with_context(|| format!("failed to process {}", config.root.display()))?;

    for (dataset, err) in &summary.failed_datasets {
        warn!(%dataset, error = %err, "no output for dataset");
    }
    info!(
        datasets = summary.datasets.len(),
        files = summary.processed_files(),
        failed_files = summary.failed_files(),
        "done"
    );

    Ok(())
}
