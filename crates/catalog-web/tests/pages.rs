//! End-to-end tests for the catalog pages.

use async_trait::async_trait;
use axum::{body::Body, http::Request};
use catalog_store::{CatalogStore, MemoryStore, StoreError};
use catalog_types::{Asset, AssetFilter, AssetQuery, Category};
use catalog_web::{web_routes, WebState};
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tower::ServiceExt;

fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    store.insert_category(
        Category::new("c1", "Backgrounds", "backgrounds")
            .with_description("Wallpapers and textures")
            .with_display_order(1),
    );
    store.insert_category(Category::new("c2", "AI Prompts", "ai-prompts").with_display_order(2));

    for i in 0..25 {
        store.insert_asset(
            Asset::new(
                format!("bg-{i}"),
                format!("Dune {i}"),
                format!("https://cdn.example/bg-{i}.png"),
                format!("https://cdn.example/bg-{i}_thumb.png"),
            )
            .in_category("c1")
            .created(base + Duration::hours(i)),
        );
    }
    store.insert_asset(
        Asset::new("p-1", "Cat astronaut", "f", "t")
            .in_category("c2")
            .with_description("a cat floating in space, oil painting"),
    );
    Arc::new(store)
}

fn app(store: Arc<dyn CatalogStore>) -> axum::Router {
    web_routes().with_state(WebState::new(store))
}

async fn get(app: &axum::Router, uri: &str) -> (u16, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_home_lists_sections() {
    let app = app(seeded_store());
    let (status, html) = get(&app, "/").await;

    assert_eq!(status, 200);
    assert!(html.contains("Backgrounds"));
    assert!(html.contains("More +"));
    assert!(html.contains(r#"href="/category/ai-prompts""#));
    // Ten latest per section
    assert!(html.contains("Dune 24"));
    assert!(html.contains("Dune 15"));
    assert!(!html.contains("Dune 14<"));
}

#[tokio::test]
async fn test_category_paginates() {
    let app = app(seeded_store());

    let (status, html) = get(&app, "/category/backgrounds").await;
    assert_eq!(status, 200);
    assert!(html.contains("25 assets available"));
    assert!(html.contains("Dune 24"));
    assert!(html.contains("/category/backgrounds?page=2&amp;sort=latest"));

    let (status, html) = get(&app, "/category/backgrounds?page=2").await;
    assert_eq!(status, 200);
    assert!(html.contains("Dune 0<"));
    assert!(!html.contains("Dune 24"));
}

#[tokio::test]
async fn test_prompt_collection_renders_copy_buttons() {
    let app = app(seeded_store());
    let (status, html) = get(&app, "/category/ai-prompts").await;

    assert_eq!(status, 200);
    assert!(html.contains(r#"data-copy="a cat floating in space, oil painting""#));
}

#[tokio::test]
async fn test_unknown_category_is_404() {
    let app = app(seeded_store());
    let (status, html) = get(&app, "/category/nope").await;

    assert_eq!(status, 404);
    assert!(html.contains("Category not found"));
}

#[tokio::test]
async fn test_asset_detail_counts_view() {
    let store = seeded_store();
    let app = app(store.clone());

    let (status, html) = get(&app, "/asset/bg-3").await;
    assert_eq!(status, 200);
    assert!(html.contains("Dune 3"));
    assert!(html.contains(r#"action="/downloads/bg-3""#));
    assert!(html.contains("Related Assets"));

    let asset = store.asset("bg-3").await.unwrap().unwrap();
    assert_eq!(asset.views(), 1);
}

#[tokio::test]
async fn test_unknown_asset_is_404() {
    let app = app(seeded_store());
    let (status, html) = get(&app, "/asset/missing").await;

    assert_eq!(status, 404);
    assert!(html.contains("Asset not found"));
}

#[tokio::test]
async fn test_search_results() {
    let app = app(seeded_store());

    let (status, html) = get(&app, "/search?q=ASTRONAUT").await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"Search Results for "ASTRONAUT""#));
    assert!(html.contains("1 assets found"));

    let (_, html) = get(&app, "/search?q=zebra").await;
    assert!(html.contains("No assets found matching your search."));
}

#[tokio::test]
async fn test_search_without_query_prompts() {
    let app = app(seeded_store());
    let (status, html) = get(&app, "/search").await;

    assert_eq!(status, 200);
    assert!(html.contains("Enter a search term"));
}

#[tokio::test]
async fn test_unmatched_path_is_404_page() {
    let app = app(seeded_store());
    for uri in ["/about", "/category", "/assets/bg-1", "/search/extra"] {
        let (status, html) = get(&app, uri).await;
        assert_eq!(status, 404, "{uri}");
        assert!(html.contains("Page not found"), "{uri}");
    }
}

#[tokio::test]
async fn test_download_redirects_and_records() {
    let store = seeded_store();
    let app = app(store.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/downloads/bg-7")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), 303);
    assert_eq!(
        response.headers()["location"],
        "https://cdn.example/bg-7.png"
    );
    assert_eq!(store.downloads().len(), 1);
    assert_eq!(store.asset("bg-7").await.unwrap().unwrap().downloads(), 1);

    let request = Request::builder()
        .method("POST")
        .uri("/downloads/missing")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), 404);
}

struct UnavailableStore;

#[async_trait]
impl CatalogStore for UnavailableStore {
    async fn categories(&self) -> catalog_store::Result<Vec<Category>> {
        Err(unavailable())
    }

    async fn category_by_slug(&self, _slug: &str) -> catalog_store::Result<Option<Category>> {
        Err(unavailable())
    }

    async fn assets(&self, _query: &AssetQuery) -> catalog_store::Result<Vec<Asset>> {
        Err(unavailable())
    }

    async fn count_assets(&self, _filter: &AssetFilter) -> catalog_store::Result<u64> {
        Err(unavailable())
    }

    async fn asset(&self, _id: &str) -> catalog_store::Result<Option<Asset>> {
        Err(unavailable())
    }

    async fn increment_views(&self, _id: &str) -> catalog_store::Result<()> {
        Err(unavailable())
    }

    async fn record_download(&self, _asset: &Asset) -> catalog_store::Result<u64> {
        Err(unavailable())
    }

    async fn ping(&self) -> catalog_store::Result<()> {
        Err(unavailable())
    }
}

fn unavailable() -> StoreError {
    StoreError::Backend {
        status: 503,
        message: "unavailable".into(),
    }
}

#[tokio::test]
async fn test_store_failure_is_bad_gateway() {
    let app = app(Arc::new(UnavailableStore));

    let (status, _) = get(&app, "/").await;
    assert_eq!(status, 502);

    let (status, _) = get(&app, "/search?q=cat").await;
    assert_eq!(status, 502);

    // The 404 page only needs navigation, which degrades to empty.
    let (status, _) = get(&app, "/nowhere").await;
    assert_eq!(status, 404);
}

/// Serves everything from the seeded store except the category list.
struct NavigationOutage(Arc<MemoryStore>);

#[async_trait]
impl CatalogStore for NavigationOutage {
    async fn categories(&self) -> catalog_store::Result<Vec<Category>> {
        Err(unavailable())
    }

    async fn category_by_slug(&self, slug: &str) -> catalog_store::Result<Option<Category>> {
        self.0.category_by_slug(slug).await
    }

    async fn assets(&self, query: &AssetQuery) -> catalog_store::Result<Vec<Asset>> {
        self.0.assets(query).await
    }

    async fn count_assets(&self, filter: &AssetFilter) -> catalog_store::Result<u64> {
        self.0.count_assets(filter).await
    }

    async fn asset(&self, id: &str) -> catalog_store::Result<Option<Asset>> {
        self.0.asset(id).await
    }

    async fn increment_views(&self, id: &str) -> catalog_store::Result<()> {
        self.0.increment_views(id).await
    }

    async fn record_download(&self, asset: &Asset) -> catalog_store::Result<u64> {
        self.0.record_download(asset).await
    }

    async fn ping(&self) -> catalog_store::Result<()> {
        self.0.ping().await
    }
}

#[tokio::test]
async fn test_category_page_survives_navigation_failure() {
    let app = app(Arc::new(NavigationOutage(seeded_store())));

    let (status, html) = get(&app, "/category/backgrounds").await;
    assert_eq!(status, 200);
    assert!(html.contains("Wallpapers and textures"));
    assert!(!html.contains("/category/ai-prompts"));

    let (status, _) = get(&app, "/asset/bg-3").await;
    assert_eq!(status, 200);

    let (status, _) = get(&app, "/").await;
    assert_eq!(status, 502);
}
