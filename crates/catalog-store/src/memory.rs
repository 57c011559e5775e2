//! In-memory catalog store.

use async_trait::async_trait;
use catalog_types::{Asset, AssetFilter, AssetQuery, Category, Download, NewDownload, SortOrder};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info};

use crate::{CatalogStore, Result, StoreError};

/// Contents of a seed fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    /// Category rows.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Asset rows.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Download rows.
    #[serde(default)]
    pub downloads: Vec<Download>,
}

impl CatalogSeed {
    /// Reads a seed from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("json") => serde_json::from_str(&contents)
                .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display()))),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
                .map_err(|e| StoreError::Seed(format!("{}: {e}", path.display()))),
            _ => Err(StoreError::Seed(format!(
                "{}: expected a .json, .yaml or .yml file",
                path.display()
            ))),
        }
    }
}

/// Catalog tables held in process memory.
///
/// Ordering follows the backend's rules: descending sorts put missing
/// values first, the ascending category order puts them last, and ties
/// keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<CatalogSeed>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the seed's rows.
    pub fn from_seed(seed: CatalogSeed) -> Self {
        Self {
            tables: RwLock::new(seed),
        }
    }

    /// Creates a store from a seed fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let seed = CatalogSeed::load(path)?;
        info!(
            path = %path.display(),
            categories = seed.categories.len(),
            assets = seed.assets.len(),
            "Loaded catalog seed"
        );
        Ok(Self::from_seed(seed))
    }

    /// Adds a category.
    pub fn insert_category(&self, category: Category) {
        self.tables.write().categories.push(category);
    }

    /// Adds an asset.
    pub fn insert_asset(&self, asset: Asset) {
        self.tables.write().assets.push(asset);
    }

    /// All recorded downloads.
    pub fn downloads(&self) -> Vec<Download> {
        self.tables.read().downloads.clone()
    }

    fn matching(&self, filter: &AssetFilter) -> Vec<Asset> {
        self.tables
            .read()
            .assets
            .iter()
            .filter(|asset| filter.accepts(asset))
            .cloned()
            .collect()
    }
}

/// Descending comparison with missing values first.
fn desc_nulls_first<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(a),
    }
}

/// Ascending comparison with missing values last.
fn asc_nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.tables.read().categories.clone();
        categories.sort_by(|a, b| asc_nulls_last(&a.display_order, &b.display_order));
        Ok(categories)
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .tables
            .read()
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn assets(&self, query: &AssetQuery) -> Result<Vec<Asset>> {
        let mut assets = self.matching(&query.filter);
        match query.order {
            SortOrder::Latest => {
                assets.sort_by(|a, b| desc_nulls_first(&a.created_at, &b.created_at))
            }
            SortOrder::Trending => {
                assets.sort_by(|a, b| desc_nulls_first(&a.downloads_count, &b.downloads_count))
            }
        }

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        Ok(assets
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect())
    }

    async fn count_assets(&self, filter: &AssetFilter) -> Result<u64> {
        Ok(self.matching(filter).len() as u64)
    }

    async fn asset(&self, id: &str) -> Result<Option<Asset>> {
        Ok(self
            .tables
            .read()
            .assets
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn increment_views(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write();
        if let Some(asset) = tables.assets.iter_mut().find(|a| a.id == id) {
            asset.views_count = Some(asset.views() + 1);
            debug!(asset_id = %id, views = asset.views(), "View recorded");
        }
        Ok(())
    }

    async fn record_download(&self, asset: &Asset) -> Result<u64> {
        let new_download = NewDownload::for_asset(&asset.id);
        let mut tables = self.tables.write();

        tables.downloads.push(Download {
            id: uuid::Uuid::new_v4().to_string(),
            asset_id: Some(new_download.asset_id),
            downloaded_at: Some(Utc::now()),
            ip_address: Some(new_download.ip_address),
        });

        let count = match tables.assets.iter_mut().find(|a| a.id == asset.id) {
            Some(stored) => {
                let count = stored.downloads() + 1;
                stored.downloads_count = Some(count);
                count
            }
            None => asset.downloads() + 1,
        };
        debug!(asset_id = %asset.id, downloads = count, "Download recorded");
        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
