//! HTTP route handlers for the Memberhub API
//!
//! This module contains the HTTP surface:
//! - GraphQL endpoint and playground
//! - Health check and status endpoints

pub mod graphql;
pub mod health;

pub use graphql::graphql_router;
pub use health::{health_router, HealthState};

use axum::{routing::get, Router};

use crate::graphql::GraphQLState;

/// Assemble the application router without transport layers
///
/// Routes:
/// - `GET /` banner
/// - `POST /graphql`, `GET /graphql/playground` (when enabled)
/// - `GET /health`, `GET /health/live`, `GET /health/ready`
pub fn app_router(graphql: GraphQLState, health: HealthState, playground: bool) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(graphql_router(graphql, playground))
        .nest("/health", health_router(health))
}

async fn root() -> &'static str {
    "Welcome to Memberhub - GraphQL membership API"
}
