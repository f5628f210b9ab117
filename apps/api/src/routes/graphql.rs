//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - Execute a query or mutation
//! - `GET /graphql/playground` - GraphQL Playground, off in production

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::Extension,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};

use crate::graphql::GraphQLState;

/// Create the GraphQL router
pub fn graphql_router(state: GraphQLState, playground: bool) -> Router {
    let mut router = Router::new().route("/graphql", post(graphql_handler));

    if playground {
        router = router.route("/graphql/playground", get(graphql_playground));
    }

    router.layer(Extension(state))
}

/// GraphQL handler that executes queries against the schema
///
/// Every request gets its own loader registry, so batching and memoization
/// never cross request boundaries.
async fn graphql_handler(
    Extension(state): Extension<GraphQLState>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.execute(req.into_inner()).await.into()
}

/// GraphQL Playground handler for development
async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
