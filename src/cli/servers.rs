// ABOUTME: CLI servers command - list servers and run start/stop/reboot/delete
//
// Actions go through the resource coordinator, so a server already busy is refused
// and the list is re-fetched after each state change.

use anyhow::{Result, bail};
use tracing::debug;

use super::util::{Backend, confirm, emit, truncate};
use super::{OutputFormat, ServerAction};
use crate::config::AppConfig;
use crate::lifecycle::{ActionError, ResourceActionCoordinator, ResourceRow};

/// Execute the servers command
pub async fn execute(action: ServerAction, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let backend = Backend::connect(config)?;
    let coordinator = ResourceActionCoordinator::new(backend.provisioning);

    match action {
        ServerAction::List => list(&coordinator, format).await,
        ServerAction::Start { id } => {
            let result = coordinator.start(&id).await;
            report(&coordinator, &id, result, format).await
        }
        ServerAction::Stop { id } => {
            let result = coordinator.stop(&id).await;
            report(&coordinator, &id, result, format).await
        }
        ServerAction::Reboot { id } => {
            let result = coordinator.reboot(&id).await;
            report(&coordinator, &id, result, format).await
        }
        ServerAction::Delete { id, yes } => {
            if !yes
                && config.ui_preferences.confirm_delete
                && !confirm(&format!("Delete server '{id}'?"))?
            {
                println!("Cancelled.");
                return Ok(());
            }
            coordinator.delete(&id).await?;
            println!("Deleted server {id}.");
            Ok(())
        }
    }
}

async fn list(coordinator: &ResourceActionCoordinator, format: OutputFormat) -> Result<()> {
    if let Err(e) = coordinator.refresh().await {
        debug!(error = %e, "List refresh failed");
        if let Some(message) = coordinator.last_error().await {
            bail!(message);
        }
    }
    let rows = coordinator.rows().await;
    emit(format, &rows, || output_text(&rows))
}

/// Print the refreshed row for `id`, then surface the action outcome
async fn report(
    coordinator: &ResourceActionCoordinator,
    id: &str,
    result: Result<(), ActionError>,
    format: OutputFormat,
) -> Result<()> {
    let rows: Vec<ResourceRow> = coordinator
        .rows()
        .await
        .into_iter()
        .filter(|row| row.id == id)
        .collect();
    emit(format, &rows, || output_text(&rows))?;
    result.map_err(Into::into)
}

/// Output servers as a text table
fn output_text(rows: &[ResourceRow]) {
    if rows.is_empty() {
        println!("No servers found.");
        return;
    }

    println!(
        "{:<36} {:<20} {:<14} {:<15} {:<14} CREATED",
        "ID", "NAME", "STATUS", "IP", "FLAVOR"
    );
    println!("{}", "-".repeat(110));

    for row in rows {
        let status = row
            .busy
            .map_or_else(|| row.status.label.clone(), |kind| kind.progress_label().to_string());
        println!(
            "{:<36} {:<20} {:<14} {:<15} {:<14} {}",
            truncate(&row.id, 36),
            truncate(&row.name, 20),
            status,
            row.ip,
            truncate(&row.flavor, 14),
            row.created
        );
    }
}
