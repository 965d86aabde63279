// ABOUTME: Shared CLI utilities - backend wiring, output helpers and prompts
//
// Every command builds its collaborators through `Backend` so they share one HTTP client.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

use super::OutputFormat;
use crate::api::{ChecklistApi, CloudApiClient, ProvisioningApi, StatsApi};
use crate::config::AppConfig;
use crate::lifecycle::{
    ChecklistSynchronizer, DashboardRefresh, ResourceActionCoordinator, StatsAggregator,
};

/// The three backend seams, all served by one client
#[derive(Clone)]
pub struct Backend {
    pub provisioning: Arc<dyn ProvisioningApi>,
    pub checklist: Arc<dyn ChecklistApi>,
    pub stats: Arc<dyn StatsApi>,
}

impl Backend {
    pub fn connect(config: &AppConfig) -> Result<Self> {
        let client = Arc::new(
            CloudApiClient::new(&config.api).context("Failed to set up the console API client")?,
        );
        Ok(Self {
            provisioning: client.clone(),
            checklist: client.clone(),
            stats: client,
        })
    }

    pub fn dashboard(&self) -> DashboardRefresh {
        DashboardRefresh::new(
            Arc::new(ResourceActionCoordinator::new(self.provisioning.clone())),
            Arc::new(ChecklistSynchronizer::new(self.checklist.clone())),
            Arc::new(StatsAggregator::new(self.stats.clone())),
        )
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Print `text` or the JSON form of `value` depending on `format`
pub fn emit<T: Serialize + ?Sized>(format: OutputFormat, value: &T, text: impl FnOnce()) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Text => {
            text();
            Ok(())
        }
    }
}

/// Ask a yes/no question on stdin; anything but "y" is a no
pub fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Truncate a string to fit in the given width (character-aware for UTF-8)
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
