//! Catalog Web Pages
//!
//! Server-rendered HTML for the asset catalog:
//! - Home page with one section per category
//! - Paginated category listings with latest/trending sort
//! - Asset detail with related assets and a download action
//! - Search results
//!
//! Every page request is resolved through [`catalog_router::resolve`];
//! there is no per-page axum route.

pub mod error;
pub mod routes;
pub mod templates;

pub use error::WebError;
pub use routes::{web_routes, ListingParams, WebState};
pub use templates::*;
