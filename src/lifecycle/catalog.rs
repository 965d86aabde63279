// ABOUTME: Fallback-wrapped loading of the wizard's option catalogs
// Each catalog is fetched independently and resolves to live or built-in data, never an error

use std::future::Future;
use tracing::{debug, warn};

use crate::api::{ApiResult, ProvisioningApi};
use crate::models::{
    CatalogSource, OptionCatalogs, fallback_flavors, fallback_images, fallback_networks,
};

/// Await `fetch`; on failure or an empty result use `fallback()` instead
pub async fn fetch_or_fallback<T, Fut>(
    catalog: &'static str,
    fetch: Fut,
    fallback: fn() -> Vec<T>,
) -> (Vec<T>, CatalogSource)
where
    Fut: Future<Output = ApiResult<Vec<T>>>,
{
    match fetch.await {
        Ok(entries) if !entries.is_empty() => {
            debug!(catalog, count = entries.len(), "Loaded live catalog");
            (entries, CatalogSource::Live)
        }
        Ok(_) => {
            debug!(catalog, "Backend returned an empty catalog, using built-in list");
            (fallback(), CatalogSource::Fallback)
        }
        Err(e) => {
            warn!(catalog, error = %e, "Catalog fetch failed, using built-in list");
            (fallback(), CatalogSource::Fallback)
        }
    }
}

/// Fetch images, flavors and networks concurrently, each in isolation
pub async fn load_catalogs(api: &dyn ProvisioningApi) -> OptionCatalogs {
    let (images, flavors, networks) = tokio::join!(
        fetch_or_fallback("images", api.list_images(), fallback_images),
        fetch_or_fallback("flavors", api.list_flavors(), fallback_flavors),
        fetch_or_fallback("networks", api.list_networks(), fallback_networks),
    );

    OptionCatalogs {
        images: images.0,
        images_source: images.1,
        flavors: flavors.0,
        flavors_source: flavors.1,
        networks: networks.0,
        networks_source: networks.1,
    }
}
