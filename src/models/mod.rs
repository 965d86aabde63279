// ABOUTME: Core data models for resources, option catalogs, onboarding progress and dashboard stats

pub mod catalog;
pub mod checklist;
pub mod resource;
pub mod stats;

pub use catalog::{
    CatalogSource, CloudFlavor, CloudImage, CloudNetwork, OptionCatalogs, OsType, fallback_flavors,
    fallback_images, fallback_networks,
};
pub use checklist::{ChecklistProgress, ChecklistStep, ChecklistUpdate};
pub use resource::{
    CreateServerPayload, FlavorRef, ProvisionableResource, ResourceStatus, StatusStyle, StatusTone,
};
pub use stats::{AccountInfo, ComputeStats, DashboardStats, NetworkingStats, StorageStats};
