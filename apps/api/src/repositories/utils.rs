//! Shared SQL fragments and error mapping for the PostgreSQL store

use crate::error::ApiError;

// ============================================================================
// SQL Column Constants
// ============================================================================

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, name, balance";

/// SQL columns for user queries through a `u` alias
pub const USER_COLUMNS_ALIASED: &str = "u.id, u.name, u.balance";

/// SQL columns for profile queries
pub const PROFILE_COLUMNS: &str = "id, is_male, year_of_birth, user_id, member_type_id";

/// SQL columns for post queries
pub const POST_COLUMNS: &str = "id, title, content, author_id";

/// SQL columns for member type queries
pub const MEMBER_TYPE_COLUMNS: &str = "id, discount, posts_limit_per_month";

/// Map a read failure to an API error
pub fn map_read_error(err: sqlx::Error) -> ApiError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => ApiError::DatabaseUnavailable,
        other => ApiError::Database(other),
    }
}

/// Map a write failure to an API error
///
/// Unique violations become conflicts on `resource_type`/`id`; foreign-key
/// violations become not-found errors on the referenced resource.
pub fn map_write_error(
    err: sqlx::Error,
    resource_type: &'static str,
    id: impl ToString,
    referenced: &'static str,
) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ApiError::conflict(resource_type, id);
        }
        if db_err.is_foreign_key_violation() {
            let detail = db_err
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| "reference".to_string());
            return ApiError::not_found(referenced, detail);
        }
    }
    map_read_error(err)
}
