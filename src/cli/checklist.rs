// ABOUTME: CLI checklist command - show onboarding progress or mark a step complete

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use super::util::{Backend, emit};
use super::{ChecklistAction, OutputFormat};
use crate::config::AppConfig;
use crate::lifecycle::{ChecklistRow, ChecklistSynchronizer};
use crate::models::ChecklistStep;

#[derive(Debug, Serialize)]
struct ChecklistOutput {
    completion_pct: u8,
    steps: Vec<ChecklistRow>,
}

/// Execute the checklist command
pub async fn execute(
    action: Option<ChecklistAction>,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<()> {
    let backend = Backend::connect(config)?;
    let sync = ChecklistSynchronizer::new(backend.checklist);

    match action.unwrap_or(ChecklistAction::Show) {
        ChecklistAction::Show => {
            sync.refresh()
                .await
                .context("Could not load the onboarding checklist")?;
        }
        ChecklistAction::Mark { step } => {
            let step = ChecklistStep::from_key(&step).ok_or_else(|| {
                let keys: Vec<&str> = ChecklistStep::all().iter().map(ChecklistStep::key).collect();
                anyhow!("Unknown step '{step}'. Expected one of: {}", keys.join(", "))
            })?;
            sync.mark_complete(step).await?;
        }
    }

    let output = ChecklistOutput {
        completion_pct: sync.percentage().await,
        steps: sync.rows().await,
    };
    emit(format, &output, || output_text(&output))
}

fn output_text(output: &ChecklistOutput) {
    println!("Getting started: {}% complete", output.completion_pct);
    for row in &output.steps {
        let mark = if row.done { "\u{2713}" } else { " " };
        println!("  [{mark}] {:<24} {}", row.label, row.description);
    }
}
