// ABOUTME: CLI catalog command - images, flavors and networks offered by the wizard
//
// Each list reports whether it came from the backend or the built-in fallback.

use anyhow::Result;

use super::OutputFormat;
use super::util::{Backend, emit};
use crate::config::AppConfig;
use crate::lifecycle::load_catalogs;
use crate::models::{CatalogSource, OptionCatalogs};

/// Execute the catalog command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let backend = Backend::connect(config)?;
    let catalogs = load_catalogs(backend.provisioning.as_ref()).await;
    emit(format, &catalogs, || output_text(&catalogs))
}

fn source_label(source: CatalogSource) -> &'static str {
    match source {
        CatalogSource::Live => "live",
        CatalogSource::Fallback => "built-in",
    }
}

fn output_text(catalogs: &OptionCatalogs) {
    println!("Images ({})", source_label(catalogs.images_source));
    for image in &catalogs.images {
        println!("  {:<14} {}", image.image_id, image.name);
    }

    println!("Flavors ({})", source_label(catalogs.flavors_source));
    for flavor in &catalogs.flavors {
        println!(
            "  {:<14} {:<14} {:<32} {}",
            flavor.flavor_id,
            flavor.name,
            flavor.spec_line(),
            flavor.hourly_cost_label()
        );
    }

    println!("Networks ({})", source_label(catalogs.networks_source));
    println!("  {:<14} Default network", "-");
    for network in &catalogs.networks {
        println!("  {:<14} {}", network.id, network.name);
    }
}
