// ABOUTME: Option catalogs offered by the provisioning wizard (images, flavors, networks)
// Includes the built-in fallback lists used when the backend cannot supply them

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    #[default]
    Linux,
    Windows,
    Custom,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudImage {
    pub image_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub os_name: String,
    #[serde(default)]
    pub os_type: OsType,
    #[serde(default)]
    pub os_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudFlavor {
    pub flavor_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub memory_mb: u64,
    #[serde(default)]
    pub disk_gb: u64,
    /// Decimal string as the backend prices it, e.g. "0.0280"
    #[serde(default)]
    pub hourly_cost_usd: String,
    #[serde(default)]
    pub is_gpu: bool,
}

impl CloudFlavor {
    /// "2 vCPU · 4 GB RAM · 80 GB SSD"
    pub fn spec_line(&self) -> String {
        format!(
            "{} vCPU · {} GB RAM · {} GB SSD",
            self.vcpus,
            self.memory_gb(),
            self.disk_gb
        )
    }

    /// Memory rounded to whole gigabytes
    pub fn memory_gb(&self) -> u64 {
        self.memory_mb.saturating_add(512) / 1024
    }

    pub fn hourly_cost_label(&self) -> String {
        format!("${}/hr", self.hourly_cost_usd)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudNetwork {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Where a catalog's entries came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Live,
    Fallback,
}

/// The three option catalogs a wizard instance works from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCatalogs {
    pub images: Vec<CloudImage>,
    pub images_source: CatalogSource,
    pub flavors: Vec<CloudFlavor>,
    pub flavors_source: CatalogSource,
    pub networks: Vec<CloudNetwork>,
    pub networks_source: CatalogSource,
}

impl OptionCatalogs {
    /// Catalogs made only of built-in entries
    pub fn builtin() -> Self {
        Self {
            images: fallback_images(),
            images_source: CatalogSource::Fallback,
            flavors: fallback_flavors(),
            flavors_source: CatalogSource::Fallback,
            networks: fallback_networks(),
            networks_source: CatalogSource::Fallback,
        }
    }

    pub fn image(&self, image_id: &str) -> Option<&CloudImage> {
        self.images.iter().find(|i| i.image_id == image_id)
    }

    pub fn flavor(&self, flavor_id: &str) -> Option<&CloudFlavor> {
        self.flavors.iter().find(|f| f.flavor_id == flavor_id)
    }

    pub fn network(&self, network_id: &str) -> Option<&CloudNetwork> {
        self.networks.iter().find(|n| n.id == network_id)
    }
}

fn image(image_id: &str, name: &str, os_name: &str, os_type: OsType, os_version: &str) -> CloudImage {
    CloudImage {
        image_id: image_id.to_string(),
        name: name.to_string(),
        os_name: os_name.to_string(),
        os_type,
        os_version: os_version.to_string(),
    }
}

fn flavor(
    flavor_id: &str,
    name: &str,
    vcpus: u32,
    memory_mb: u64,
    disk_gb: u64,
    hourly_cost_usd: &str,
    is_gpu: bool,
) -> CloudFlavor {
    CloudFlavor {
        flavor_id: flavor_id.to_string(),
        name: name.to_string(),
        vcpus,
        memory_mb,
        disk_gb,
        hourly_cost_usd: hourly_cost_usd.to_string(),
        is_gpu,
    }
}

/// Built-in images shown when the backend has none to offer
pub fn fallback_images() -> Vec<CloudImage> {
    vec![
        image("ubuntu-22", "Ubuntu 22.04 LTS", "Ubuntu", OsType::Linux, "22.04 LTS"),
        image("debian-12", "Debian 12", "Debian", OsType::Linux, "12 Bookworm"),
        image("centos-9", "CentOS Stream 9", "CentOS", OsType::Linux, "Stream 9"),
        image("win-2022", "Windows Server 2022", "Windows", OsType::Windows, "2022"),
    ]
}

/// Built-in flavors shown when the backend has none to offer
pub fn fallback_flavors() -> Vec<CloudFlavor> {
    vec![
        flavor("small", "Starter", 1, 1024, 25, "0.0075", false),
        flavor("medium", "Standard", 2, 4096, 80, "0.0280", false),
        flavor("large", "Performance", 4, 8192, 160, "0.0550", false),
        flavor("gpu-v1", "GPU Compute", 8, 32768, 400, "0.4900", true),
    ]
}

/// Networks have no built-in entries: the default network needs no id
pub fn fallback_networks() -> Vec<CloudNetwork> {
    Vec::new()
}
