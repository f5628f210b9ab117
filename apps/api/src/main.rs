use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memberhub_api::config::{Config, StoreBackend};
use memberhub_api::graphql::GraphQLState;
use memberhub_api::repositories::{MemoryStore, PgStore, SharedStore};
use memberhub_api::routes::{app_router, HealthState};

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                    .max_age(std::time::Duration::from_secs(3600))
            }
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

/// Open the configured store
async fn open_store(config: &Config) -> anyhow::Result<SharedStore> {
    let store: SharedStore = match config.store_backend {
        StoreBackend::Postgres => Arc::new(PgStore::connect(config.database()).await?),
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memberhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.environment(),
        "Starting Memberhub API server on port {}",
        config.port
    );

    let store = open_store(&config).await?;

    let graphql_state = GraphQLState::from_store(
        store.clone(),
        config.graphql_depth_limit,
        config.mutation_failure_policy,
        config.loader_settings(),
    );
    tracing::info!(
        depth_limit = config.graphql_depth_limit,
        batch_delay_ms = config.graphql_batch_delay_ms,
        max_batch_size = config.graphql_max_batch_size,
        failure_policy = ?config.mutation_failure_policy,
        "GraphQL schema built"
    );

    let playground = !config.is_production();
    let app = app_router(graphql_state, HealthState::new(store), playground)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    if playground {
        tracing::info!(
            "GraphQL Playground available at http://{}:{}/graphql/playground",
            addr.ip(),
            addr.port()
        );
    }

    axum::serve(listener, app).await?;

    Ok(())
}
