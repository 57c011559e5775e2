//! Resolved routes.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

/// Which page a location selects, with its parameters.
///
/// Exactly one variant is current at any time. Values are immutable: a
/// navigation replaces the current route with a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Route {
    /// The landing page (`/`).
    Home,
    /// A category listing (`/category/{slug}`).
    Category {
        /// Remainder of the path after the prefix, verbatim.
        slug: String,
    },
    /// A single asset (`/asset/{asset_id}`).
    AssetDetail {
        /// Remainder of the path after the prefix, verbatim.
        asset_id: String,
    },
    /// Search results (`/search?q=...`).
    Search {
        /// The `q` parameter, empty when absent.
        query: String,
    },
    /// Anything else.
    NotFound,
}

/// Payload-free discriminant of a [`Route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Home,
    Category,
    AssetDetail,
    Search,
    NotFound,
}

impl RouteKind {
    /// Stable lower-case name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Home => "home",
            RouteKind::Category => "category",
            RouteKind::AssetDetail => "asset_detail",
            RouteKind::Search => "search",
            RouteKind::NotFound => "not_found",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Route {
    /// Category route for `slug`.
    pub fn category(slug: impl Into<String>) -> Self {
        Route::Category { slug: slug.into() }
    }

    /// Asset detail route for `asset_id`.
    pub fn asset(asset_id: impl Into<String>) -> Self {
        Route::AssetDetail {
            asset_id: asset_id.into(),
        }
    }

    /// Search route for `query`.
    pub fn search(query: impl Into<String>) -> Self {
        Route::Search {
            query: query.into(),
        }
    }

    /// The variant without its payload.
    pub fn kind(&self) -> RouteKind {
        match self {
            Route::Home => RouteKind::Home,
            Route::Category { .. } => RouteKind::Category,
            Route::AssetDetail { .. } => RouteKind::AssetDetail,
            Route::Search { .. } => RouteKind::Search,
            Route::NotFound => RouteKind::NotFound,
        }
    }

    /// Canonical href for links to this route.
    ///
    /// Path parameters are emitted verbatim; the search query is
    /// form-encoded. [`Route::NotFound`] points at `/404`, which no rule
    /// matches.
    pub fn href(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Category { slug } => format!("/category/{slug}"),
            Route::AssetDetail { asset_id } => format!("/asset/{asset_id}"),
            Route::Search { query } if query.is_empty() => "/search".to_string(),
            Route::Search { query } => {
                let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
                format!("/search?q={encoded}")
            }
            Route::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "home"),
            Route::Category { slug } => write!(f, "category({slug})"),
            Route::AssetDetail { asset_id } => write!(f, "asset_detail({asset_id})"),
            Route::Search { query } => write!(f, "search({query:?})"),
            Route::NotFound => write!(f, "not_found"),
        }
    }
}
