//! # Observability Module
//!
//! - **Structured Logging**: pretty or JSON logs driven by `tracing`
//! - **Request Tracing**: request id propagation through a span per request
//!
//! ## Usage
//!
//! ```rust,ignore
//! use axum::Router;
//! use catalog_node::observability::{init_logging, request_id_layer};
//!
//! init_logging("info", LogFormat::Json);
//!
//! let app: Router<()> = Router::new()
//!     .layer(request_id_layer());
//! ```

mod logging;
pub mod middleware;

pub use logging::init_logging;
pub use middleware::{request_id_layer, RequestId, REQUEST_ID_HEADER};
