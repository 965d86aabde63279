// ABOUTME: CLI deploy command - drives the provisioning wizard without a UI
//
// Walks the wizard steps in order so every step's validation applies, then submits
// (or only previews with --dry-run) and refreshes the dashboard views on success.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use super::util::{Backend, emit};
use super::{DeployArgs, OutputFormat, ServerSelectionArgs};
use crate::config::AppConfig;
use crate::lifecycle::{RefreshReport, WizardController, WizardStep};
use crate::models::{CatalogSource, ProvisionableResource};
use crate::preview::SummaryRow;

#[derive(Debug, Serialize)]
struct DryRunOutput {
    summary: Vec<SummaryRow>,
    preview: String,
}

#[derive(Debug, Serialize)]
struct DeployOutput {
    server: ProvisionableResource,
    refreshed: Option<RefreshReport>,
}

/// Fill the wizard from `selection`, advancing through every step
pub async fn fill_wizard(wizard: &WizardController, selection: &ServerSelectionArgs) -> Result<()> {
    let catalogs = wizard.load_options().await;
    if catalogs.images_source == CatalogSource::Fallback {
        eprintln!("Note: using the built-in image list, the backend offered none.");
    }

    wizard.select_image(&selection.image)?;
    wizard.next()?;
    wizard.select_flavor(&selection.flavor)?;
    wizard.next()?;
    wizard.select_network(selection.network.as_deref())?;
    wizard.set_name(&selection.name)?;
    if let Some(key_name) = &selection.key_name {
        wizard.set_key_name(key_name)?;
    }

    if !wizard.can_advance(WizardStep::NetworkAndName) {
        anyhow::bail!("Server name must be at least two characters");
    }
    Ok(())
}

/// Execute the deploy command
pub async fn execute(args: DeployArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let backend = Backend::connect(config)?;
    let dashboard = backend.dashboard();
    let wizard = WizardController::new(backend.provisioning.clone())
        .with_checklist(Arc::clone(dashboard.checklist()))
        .with_success_delay(config.wizard.success_delay());

    fill_wizard(&wizard, &args.selection).await?;

    if args.dry_run {
        let output = DryRunOutput {
            summary: wizard.summary(),
            preview: wizard.preview(),
        };
        return emit(format, &output, || {
            for row in &output.summary {
                println!("{:<8} {}", row.label, row.value);
            }
            println!();
            println!("{}", output.preview);
        });
    }

    let mut refreshed = None;
    let slot = &mut refreshed;
    let dashboard = &dashboard;
    let server = wizard
        .submit(move || async move {
            *slot = Some(dashboard.refresh_all().await);
        })
        .await
        .context("Server was not created")?;

    let output = DeployOutput { server, refreshed };
    emit(format, &output, || {
        println!(
            "Created server {} ({}), status {}.",
            output.server.name,
            output.server.id,
            output.server.status.style().label
        );
        if let Some(report) = &output.refreshed {
            if !report.all_ok() {
                println!("Some dashboard views could not be refreshed; see the log for details.");
            }
        }
    })
}
