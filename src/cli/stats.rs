// ABOUTME: CLI stats command - dashboard overview cards

use anyhow::{Context, Result};

use super::OutputFormat;
use super::util::{Backend, emit};
use crate::config::AppConfig;
use crate::lifecycle::StatsAggregator;

/// Execute the stats command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let backend = Backend::connect(config)?;
    let aggregator = StatsAggregator::new(backend.stats);
    let stats = aggregator
        .refresh()
        .await
        .context("Could not load dashboard statistics")?;

    emit(format, &stats, || {
        for card in stats.cards() {
            println!("{}", card.title);
            for (label, value) in &card.entries {
                println!("  {label:<16} {value}");
            }
        }
    })
}
