//! Health endpoint.
//!
//! `GET /health` pings the data store and reports the result. The
//! endpoint answers `503` while the store is unreachable.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog_store::CatalogStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use crate::config::StoreKind;

/// Health status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Store check result.
#[derive(Debug, Clone, Serialize)]
pub struct StoreHealth {
    pub kind: StoreKind,
    pub status: HealthStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Health response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: StoreHealth,
}

/// State for the health endpoint.
#[derive(Clone)]
pub struct HealthState {
    store: Arc<dyn CatalogStore>,
    kind: StoreKind,
    start_time: Instant,
}

impl HealthState {
    pub fn new(store: Arc<dyn CatalogStore>, kind: StoreKind) -> Self {
        Self {
            store,
            kind,
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    async fn check_store(&self) -> StoreHealth {
        let started = Instant::now();
        let result = self.store.ping().await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(()) => StoreHealth {
                kind: self.kind,
                status: HealthStatus::Up,
                latency_ms,
                reason: None,
            },
            Err(e) => {
                warn!(store = %self.kind, error = %e, "Store health check failed");
                StoreHealth {
                    kind: self.kind,
                    status: HealthStatus::Down,
                    latency_ms,
                    reason: Some(e.to_string()),
                }
            }
        }
    }
}

/// Create the health router.
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    HealthState: axum::extract::FromRef<S>,
{
    Router::new().route("/health", get(health_handler))
}

async fn health_handler(State(state): State<HealthState>) -> Response {
    let store = state.check_store().await;
    let status = store.status;

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime(),
        store,
    };

    let status_code = match status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response)).into_response()
}
