//! API server configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use memberhub_shared_config::{parse_env, CommonConfig, DatabaseConfig, Environment};

use crate::graphql::loaders::LoaderSettings;

/// Default maximum nesting of selection sets
///
/// Counted the way async-graphql counts it: every field level is one, the
/// top-level field included. `{ a { b { c { d { e } } } } }` is depth 5 and
/// passes; one more level is rejected.
pub const DEFAULT_DEPTH_LIMIT: usize = 5;

/// Which [`Store`](crate::repositories::Store) implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// How change, delete and (un)subscribe mutations report store failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationFailurePolicy {
    /// Log a warning and return `null` / `false`
    #[default]
    Soft,
    /// Surface the failure as a GraphQL error
    Strict,
}

impl FromStr for MutationFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soft" => Ok(Self::Soft),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown mutation failure policy '{}'", other)),
        }
    }
}

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// Store implementation (default: postgres)
    pub store_backend: StoreBackend,

    /// Maximum query depth (default: 5)
    pub graphql_depth_limit: usize,

    /// Loader batch window in milliseconds (default: 1)
    pub graphql_batch_delay_ms: u64,

    /// Maximum keys per grouped fetch (default: 1000)
    pub graphql_max_batch_size: usize,

    /// Mutation failure policy (default: soft)
    pub mutation_failure_policy: MutationFailurePolicy,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `DATABASE_URL`: Must be explicitly set (no insecure defaults)
    /// - `STORE_BACKEND`: Must not be `memory`
    pub fn from_env() -> Result<Self> {
        // Determine environment first to know if we need strict validation
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();
        let is_production = environment.is_production();

        let store_backend = Self::load_store_backend(is_production)?;

        // Validate DATABASE_URL is explicitly set in production
        if is_production {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let graphql_depth_limit = parse_env("GRAPHQL_DEPTH_LIMIT", DEFAULT_DEPTH_LIMIT)?;
        if graphql_depth_limit == 0 {
            bail!("GRAPHQL_DEPTH_LIMIT must be at least 1");
        }

        let graphql_max_batch_size = parse_env("GRAPHQL_MAX_BATCH_SIZE", 1000usize)?;
        if graphql_max_batch_size == 0 {
            bail!("GRAPHQL_MAX_BATCH_SIZE must be at least 1");
        }

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            store_backend,

            graphql_depth_limit,

            graphql_batch_delay_ms: parse_env("GRAPHQL_BATCH_DELAY_MS", 1u64)?,

            graphql_max_batch_size,

            mutation_failure_policy: env::var("MUTATION_FAILURE_POLICY")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<MutationFailurePolicy>())
                .transpose()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid MUTATION_FAILURE_POLICY value")?
                .unwrap_or_default(),

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Load and validate STORE_BACKEND
    ///
    /// The in-memory store loses everything on restart, so production refuses it.
    fn load_store_backend(is_production: bool) -> Result<StoreBackend> {
        let backend = match env::var("STORE_BACKEND") {
            Ok(value) if !value.is_empty() => value
                .parse::<StoreBackend>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("Invalid STORE_BACKEND value")?,
            _ => StoreBackend::default(),
        };

        if backend == StoreBackend::Memory {
            if is_production {
                bail!(
                    "STORE_BACKEND=memory is not allowed in production. \
                     Use the postgres backend."
                );
            }
            tracing::warn!("Using the in-memory store; data will not survive a restart");
        }

        Ok(backend)
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }

    /// Batching parameters for the per-request loaders
    pub fn loader_settings(&self) -> LoaderSettings {
        LoaderSettings {
            delay: Duration::from_millis(self.graphql_batch_delay_ms),
            max_batch_size: self.graphql_max_batch_size,
        }
    }
}
