//! Application state and router assembly.

use axum::{extract::FromRef, Router};
use catalog_store::{CatalogStore, MemoryStore, RestConfig, RestStore};
use catalog_web::{web_routes, WebState};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{StoreConfig, StoreKind};
use crate::health::{health_routes, HealthState};
use crate::observability::request_id_layer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub web: WebState,
    pub health: HealthState,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, kind: StoreKind) -> Self {
        Self {
            web: WebState::new(store.clone()),
            health: HealthState::new(store, kind),
        }
    }
}

impl FromRef<AppState> for WebState {
    fn from_ref(state: &AppState) -> Self {
        state.web.clone()
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(state: &AppState) -> Self {
        state.health.clone()
    }
}

/// Creates the node's router: health endpoint, download action and the
/// page fallback, wrapped in request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes::<AppState>())
        .merge(web_routes::<AppState>())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

/// Opens the configured data store.
pub fn open_store(config: &StoreConfig) -> catalog_store::Result<Arc<dyn CatalogStore>> {
    match config.kind {
        StoreKind::Rest => {
            let rest = RestConfig::new(
                config.url.clone().unwrap_or_default(),
                config.api_key.clone().unwrap_or_default(),
            )
            .with_timeout(Duration::from_secs(config.timeout_secs));
            let store = RestStore::new(&rest)?;
            info!(url = %store.base_url(), "Using REST store");
            Ok(Arc::new(store))
        }
        StoreKind::Memory => {
            let store = match &config.seed {
                Some(path) => MemoryStore::load(path)?,
                None => MemoryStore::new(),
            };
            info!(seeded = config.seed.is_some(), "Using in-memory store");
            Ok(Arc::new(store))
        }
    }
}
