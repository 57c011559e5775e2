//! Remote data store access for the asset catalog.
//!
//! The pages never talk to the backend directly; they go through the
//! [`CatalogStore`] trait. Two implementations are provided:
//!
//! - [`RestStore`] speaks PostgREST (the REST dialect of managed Postgres
//!   backends) over HTTP.
//! - [`MemoryStore`] keeps the three tables in memory and can be seeded
//!   from a JSON or YAML fixture, for local development and tests.

mod error;
mod memory;
mod rest;
mod traits;

pub use error::{Result, StoreError};
pub use memory::{CatalogSeed, MemoryStore};
pub use rest::{RestConfig, RestStore};
pub use traits::CatalogStore;
