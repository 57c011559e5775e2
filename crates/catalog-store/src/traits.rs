//! The data store interface consumed by the page layer.

use async_trait::async_trait;
use catalog_types::{Asset, AssetFilter, AssetQuery, Category};
use std::sync::Arc;

use crate::Result;

/// Read and counter operations the catalog pages need from the backend.
///
/// Implementations must be cheap to share; the web layer holds one
/// `Arc<dyn CatalogStore>` for the whole process.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All categories, ordered by `display_order` ascending.
    async fn categories(&self) -> Result<Vec<Category>>;

    /// The category with this slug, if any.
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// One slice of an ordered, filtered asset listing.
    async fn assets(&self, query: &AssetQuery) -> Result<Vec<Asset>>;

    /// Total number of assets matching `filter`.
    async fn count_assets(&self, filter: &AssetFilter) -> Result<u64>;

    /// The asset with this identifier, if any.
    async fn asset(&self, id: &str) -> Result<Option<Asset>>;

    /// Adds one to the asset's view counter.
    async fn increment_views(&self, id: &str) -> Result<()>;

    /// Appends a download record and bumps the asset's download counter.
    /// Returns the new counter value.
    async fn record_download(&self, asset: &Asset) -> Result<u64>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    async fn categories(&self) -> Result<Vec<Category>> {
        (**self).categories().await
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        (**self).category_by_slug(slug).await
    }

    async fn assets(&self, query: &AssetQuery) -> Result<Vec<Asset>> {
        (**self).assets(query).await
    }

    async fn count_assets(&self, filter: &AssetFilter) -> Result<u64> {
        (**self).count_assets(filter).await
    }

    async fn asset(&self, id: &str) -> Result<Option<Asset>> {
        (**self).asset(id).await
    }

    async fn increment_views(&self, id: &str) -> Result<()> {
        (**self).increment_views(id).await
    }

    async fn record_download(&self, asset: &Asset) -> Result<u64> {
        (**self).record_download(asset).await
    }

    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }
}
