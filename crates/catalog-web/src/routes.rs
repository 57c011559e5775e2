//! Page handlers for the catalog.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
    Router,
};
use catalog_router::{resolve, Location, Route};
use catalog_store::CatalogStore;
use catalog_types::{
    AssetFilter, AssetQuery, Category, Pagination, SortOrder, HOME_SECTION_SIZE, PAGE_SIZE,
    RELATED_LIMIT,
};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::WebError;
use crate::templates::*;

/// Shared state for page handlers.
#[derive(Clone)]
pub struct WebState {
    pub store: Arc<dyn CatalogStore>,
}

impl WebState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

/// Create the page router.
///
/// Pages are served from the fallback so that the whole path space goes
/// through the route table; only the download action has its own route.
pub fn web_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    WebState: axum::extract::FromRef<S>,
{
    Router::new()
        .route("/downloads/{asset_id}", post(download))
        .fallback(page)
}

/// Listing state carried in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingParams {
    pub page: u32,
    pub sort: SortOrder,
}

impl ListingParams {
    pub fn from_location(location: &Location) -> Self {
        let page = location
            .query_param("page")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1);
        let sort = location
            .query_param("sort")
            .map(SortOrder::parse)
            .unwrap_or_default();
        Self {
            page: page.max(1),
            sort,
        }
    }
}

/// Resolves the request location and renders the selected page.
async fn page(State(state): State<WebState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let location = Location::from_parts(uri.path(), uri.query());
    let route = resolve(&location);
    debug!(location = %location, route = %route.kind(), "Resolved page");

    let listing = ListingParams::from_location(&location);
    let rendered = match route {
        Route::Home => home(&state).await,
        Route::Category { slug } => category(&state, &slug, listing).await,
        Route::AssetDetail { asset_id } => asset_detail(&state, &asset_id).await,
        Route::Search { query } => search(&state, &query, listing).await,
        Route::NotFound => not_found(&state).await,
    };
    rendered.unwrap_or_else(IntoResponse::into_response)
}

fn render(status: StatusCode, template: &impl Template) -> Result<Response, WebError> {
    Ok((status, Html(template.render()?)).into_response())
}

/// Header and footer for pages whose body does not depend on the
/// category list. A store failure here only empties the navigation.
async fn layout(state: &WebState) -> Layout {
    match state.store.categories().await {
        Ok(categories) => Layout::new(&categories),
        Err(e) => {
            warn!(error = %e, "Failed to load navigation categories");
            Layout::default()
        }
    }
}

async fn home(state: &WebState) -> Result<Response, WebError> {
    let categories = state.store.categories().await?;

    let sections = try_join_all(categories.iter().map(|category| async move {
        let query = AssetQuery::new(AssetFilter::in_category(&category.id)).limit(HOME_SECTION_SIZE);
        let assets = state.store.assets(&query).await?;
        Ok::<_, WebError>(SectionView::new(category, &assets))
    }))
    .await?;

    let template = HomeTemplate {
        layout: Layout::new(&categories),
        sections,
    };
    render(StatusCode::OK, &template)
}

async fn category(
    state: &WebState,
    slug: &str,
    listing: ListingParams,
) -> Result<Response, WebError> {
    let category: Category = state
        .store
        .category_by_slug(slug)
        .await?
        .ok_or_else(|| WebError::NotFound("Category not found".into()))?;

    let filter = AssetFilter::in_category(&category.id);
    let total = state.store.count_assets(&filter).await?;
    let pagination = Pagination::new(listing.page, PAGE_SIZE, total);
    let assets = state
        .store
        .assets(&AssetQuery::new(filter).order(listing.sort).page(&pagination))
        .await?;

    let base = Location::new(Route::category(&category.slug).href())
        .with_query("sort", listing.sort.as_str());
    let (latest_href, trending_href) = CategoryTemplate::sort_hrefs(&category);

    let template = CategoryTemplate {
        layout: layout(state).await,
        name: category.name.clone(),
        description: category.description_or_empty().to_string(),
        total,
        sort_latest: listing.sort == SortOrder::Latest,
        latest_href,
        trending_href,
        prompt_collection: category.is_prompt_collection(),
        assets: asset_cards(&assets),
        pager: PagerView::build(&pagination, &base),
    };
    render(StatusCode::OK, &template)
}

async fn asset_detail(state: &WebState, asset_id: &str) -> Result<Response, WebError> {
    let asset = state
        .store
        .asset(asset_id)
        .await?
        .ok_or_else(|| WebError::NotFound("Asset not found".into()))?;

    if let Err(e) = state.store.increment_views(&asset.id).await {
        warn!(asset_id = %asset.id, error = %e, "Failed to record view");
    }

    let related = state
        .store
        .assets(&AssetQuery::new(AssetFilter::related_to(&asset)).limit(RELATED_LIMIT))
        .await?;

    let template = AssetTemplate {
        layout: layout(state).await,
        asset: AssetView::from(&asset),
        related: asset_cards(&related),
    };
    render(StatusCode::OK, &template)
}

async fn search(
    state: &WebState,
    query: &str,
    listing: ListingParams,
) -> Result<Response, WebError> {
    let layout = layout(state).await.with_search(query);

    if query.trim().is_empty() {
        let template = SearchTemplate {
            layout,
            query: String::new(),
            total: 0,
            assets: Vec::new(),
            pager: None,
        };
        return render(StatusCode::OK, &template);
    }

    let filter = AssetFilter::matching(query);
    let total = state.store.count_assets(&filter).await?;
    let pagination = Pagination::new(listing.page, PAGE_SIZE, total);
    let assets = state
        .store
        .assets(&AssetQuery::new(filter).page(&pagination))
        .await?;

    let base = Location::new("/search").with_query("q", query);
    let template = SearchTemplate {
        layout,
        query: query.to_string(),
        total,
        assets: asset_cards(&assets),
        pager: PagerView::build(&pagination, &base),
    };
    render(StatusCode::OK, &template)
}

async fn not_found(state: &WebState) -> Result<Response, WebError> {
    let template = NotFoundTemplate {
        layout: layout(state).await,
    };
    render(StatusCode::NOT_FOUND, &template)
}

/// Records a download and sends the browser to the file.
async fn download(
    State(state): State<WebState>,
    Path(asset_id): Path<String>,
) -> Result<Redirect, WebError> {
    let asset = state
        .store
        .asset(&asset_id)
        .await?
        .ok_or_else(|| WebError::NotFound("Asset not found".into()))?;

    let downloads = state.store.record_download(&asset).await?;
    info!(asset_id = %asset.id, downloads, "Asset downloaded");

    Ok(Redirect::to(&asset.file_url))
}
