//! Error handling for the Memberhub API
//!
//! This module provides a unified error type using thiserror, with an HTTP
//! status classification and conversion into GraphQL errors carrying an
//! `extensions.code`.

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use thiserror::Error;

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists (conflict)
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    // ========== Validation Errors ==========
    /// Input validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    // ========== Database Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database connection pool exhausted
    #[error("database connection unavailable")]
    DatabaseUnavailable,

    // ========== Internal Errors ==========
    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Create a conflict error for a specific resource
    pub fn conflict(resource_type: &'static str, id: impl ToString) -> Self {
        Self::Conflict {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Whether the error is the client's fault (safe to echo back verbatim)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }

    /// Convert into a GraphQL error, logging server errors
    ///
    /// Client errors keep their message; server errors are replaced with a
    /// generic message so internals never leak into responses.
    pub fn to_graphql(&self) -> async_graphql::Error {
        if !self.is_client_error() {
            self.log();
        }
        self.as_graphql_error()
    }

    /// Convert into a GraphQL error without logging
    ///
    /// For errors that were already logged where they were raised, such as a
    /// failed batch shared by every field waiting on it.
    pub fn as_graphql_error(&self) -> async_graphql::Error {
        let code = self.error_code();
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            "An unexpected error occurred".to_string()
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

/// `map_err` adapter for resolver results
pub fn to_graphql_error(error: ApiError) -> async_graphql::Error {
    error.to_graphql()
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
