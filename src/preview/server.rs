// ABOUTME: Server manifest preview and wizard summary rows
// Built from the resolved catalog entries of the current wizard selections

use serde::Serialize;

use super::{Preview, PreviewSection};
use crate::models::{CloudFlavor, CloudImage, CloudNetwork};

const MISSING: &str = "—";

/// Resolved server wizard selections
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerForm<'a> {
    pub name: &'a str,
    pub image: Option<&'a CloudImage>,
    pub flavor: Option<&'a CloudFlavor>,
    pub network: Option<&'a CloudNetwork>,
    pub key_name: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
    pub highlight: bool,
}

impl SummaryRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            highlight: false,
        }
    }
}

fn image_label(image: &CloudImage) -> &str {
    if image.os_name.is_empty() {
        &image.name
    } else {
        &image.os_name
    }
}

impl ServerForm<'_> {
    fn key_name(&self) -> Option<&str> {
        self.key_name.map(str::trim).filter(|k| !k.is_empty())
    }

    /// Image, Flavor, Network, optional SSH Key and Cost
    pub fn summary(&self) -> Vec<SummaryRow> {
        let mut rows = vec![
            SummaryRow::new("Image", self.image.map_or(MISSING, image_label)),
            SummaryRow::new("Flavor", self.flavor.map_or(MISSING, |f| f.name.as_str())),
            SummaryRow::new("Network", self.network.map_or("Default", |n| n.name.as_str())),
        ];
        if let Some(key) = self.key_name() {
            rows.push(SummaryRow::new("SSH Key", key));
        }
        rows.push(SummaryRow {
            highlight: true,
            ..SummaryRow::new(
                "Cost",
                self.flavor
                    .map_or_else(|| MISSING.to_string(), |f| f.hourly_cost_label()),
            )
        });
        rows
    }
}

impl Preview for ServerForm<'_> {
    fn document(&self) -> PreviewSection {
        let name = self.name.trim();
        let image = match self.image {
            Some(image) => PreviewSection::new()
                .field("id", &image.image_id)
                .field("os", image_label(image)),
            None => PreviewSection::new().field("id", MISSING),
        };
        let flavor = match self.flavor {
            Some(flavor) => PreviewSection::new()
                .field("id", &flavor.flavor_id)
                .field("vcpus", flavor.vcpus)
                .field("memory", format!("{} GB", flavor.memory_gb()))
                .field("disk", format!("{} GB", flavor.disk_gb))
                .field("hourly_cost", flavor.hourly_cost_label()),
            None => PreviewSection::new().field("id", MISSING),
        };

        PreviewSection::new().section(
            "server",
            PreviewSection::new()
                .field("name", if name.is_empty() { MISSING } else { name })
                .section("image", image)
                .section("flavor", flavor)
                .field("network", self.network.map_or("default", |n| n.id.as_str()))
                .field_opt("key_name", self.key_name())
                .field("wait", false),
        )
    }
}
