//! # Catalog Node
//!
//! HTTP server for the asset catalog front-end.
//!
//! The node wires the page layer from `catalog-web` to a data store
//! (PostgREST backend or in-memory fixture), and adds the operational
//! surface: configuration, structured logging, request ids and a health
//! endpoint.
//!
//! ## Quick Start
//!
//! ```bash
//! cargo run --bin catalog-node -- --seed fixtures/catalog.yaml
//! ```
//!
//! ## Modules
//!
//! - [`app`] - Application state and router assembly
//! - [`config`] - Node configuration management
//! - [`health`] - Health endpoint
//! - [`observability`] - Logging and request tracking

pub mod app;
pub mod config;
pub mod health;
pub mod observability;

pub use app::{create_router, open_store, AppState};
pub use config::{ConfigError, LogFormat, NodeConfig, StoreConfig, StoreKind};
