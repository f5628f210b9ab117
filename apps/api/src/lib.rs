//! Memberhub API library
//!
//! This module exposes the core API components for use in integration tests
//! and as a library.

pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod repositories;
pub mod routes;

// Re-export commonly used types
pub use config::{Config, MutationFailurePolicy, StoreBackend};
pub use error::{ApiError, ApiResult};
pub use graphql::{AppSchema, GraphQLState, LoaderFactory, LoaderSettings, RequestLoaders};
pub use repositories::{MemoryStore, PgStore, SharedStore, Store};
