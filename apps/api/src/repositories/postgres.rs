//! PostgreSQL store
//!
//! All queries are plain runtime-checked `sqlx` queries. In-set filters use
//! `= ANY($1)` with an array bind, so a grouped fetch is always one round trip
//! no matter how many keys it carries.

use async_trait::async_trait;
use memberhub_shared_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::utils::{
    map_read_error, map_write_error, MEMBER_TYPE_COLUMNS, POST_COLUMNS, PROFILE_COLUMNS,
    USER_COLUMNS, USER_COLUMNS_ALIASED,
};
use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::member_type::{MemberType, MemberTypeId};
use crate::models::post::{CreatePost, Post, UpdatePost};
use crate::models::profile::{CreateProfile, Profile, UpdateProfile};
use crate::models::subscription::{LinkedUser, SubscriptionEdge};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from configuration and run pending migrations
    pub async fn connect(config: &DatabaseConfig) -> ApiResult<Self> {
        tracing::info!(url = %config.redacted_url(), "Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect(&config.url)
            .await
            .map_err(map_read_error)?;

        tracing::info!("Database connection established");

        Self::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations to the pool's database
    pub async fn run_migrations(pool: &PgPool) -> ApiResult<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| ApiError::Internal(format!("migration failed: {}", e)))?;
        tracing::info!("Migrations completed successfully");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> ApiResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_read_error)?;
        Ok(())
    }

    // ---- member types ----

    async fn list_member_types(&self) -> ApiResult<Vec<MemberType>> {
        let sql = format!("SELECT {} FROM member_types", MEMBER_TYPE_COLUMNS);
        sqlx::query_as::<_, MemberType>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn find_member_type(&self, id: MemberTypeId) -> ApiResult<Option<MemberType>> {
        let sql = format!(
            "SELECT {} FROM member_types WHERE id = $1",
            MEMBER_TYPE_COLUMNS
        );
        sqlx::query_as::<_, MemberType>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> ApiResult<Vec<MemberType>> {
        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        let sql = format!(
            "SELECT {} FROM member_types WHERE id = ANY($1)",
            MEMBER_TYPE_COLUMNS
        );
        sqlx::query_as::<_, MemberType>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    // ---- users ----

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        let sql = format!("SELECT {} FROM users", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn find_user(&self, id: Uuid) -> ApiResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn create_user(&self, input: CreateUser) -> ApiResult<User> {
        let user = User::create(input);
        let sql = format!(
            "INSERT INTO users (id, name, balance) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(user.balance)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "user", user.id, "user"))
    }

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> ApiResult<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                balance = COALESCE($3, balance)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(input.name)
            .bind(input.balance)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "user", id, "user"))?
            .ok_or_else(|| ApiError::not_found("user", id))
    }

    async fn delete_user(&self, id: Uuid) -> ApiResult<()> {
        // Profiles, posts and subscription edges go with the user (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_read_error)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("user", id));
        }
        Ok(())
    }

    // ---- profiles ----

    async fn list_profiles(&self) -> ApiResult<Vec<Profile>> {
        let sql = format!("SELECT {} FROM profiles", PROFILE_COLUMNS);
        sqlx::query_as::<_, Profile>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn find_profile(&self, id: Uuid) -> ApiResult<Option<Profile>> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Profile>> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE user_id = ANY($1)",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn create_profile(&self, input: CreateProfile) -> ApiResult<Profile> {
        let profile = Profile::create(input);
        let sql = format!(
            r#"
            INSERT INTO profiles (id, is_male, year_of_birth, user_id, member_type_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(profile.id)
            .bind(profile.is_male)
            .bind(profile.year_of_birth)
            .bind(profile.user_id)
            .bind(profile.member_type_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "profile for user", profile.user_id, "user"))
    }

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> ApiResult<Profile> {
        let sql = format!(
            r#"
            UPDATE profiles
            SET is_male = COALESCE($2, is_male),
                year_of_birth = COALESCE($3, year_of_birth),
                member_type_id = COALESCE($4, member_type_id)
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(input.is_male)
            .bind(input.year_of_birth)
            .bind(input.member_type_id.map(|m| m.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "profile", id, "member type"))?
            .ok_or_else(|| ApiError::not_found("profile", id))
    }

    async fn delete_profile(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_read_error)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("profile", id));
        }
        Ok(())
    }

    // ---- posts ----

    async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        let sql = format!("SELECT {} FROM posts", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn find_post(&self, id: Uuid) -> ApiResult<Option<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> ApiResult<Vec<Post>> {
        let sql = format!(
            "SELECT {} FROM posts WHERE author_id = ANY($1)",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn create_post(&self, input: CreatePost) -> ApiResult<Post> {
        let post = Post::create(input);
        let sql = format!(
            "INSERT INTO posts (id, title, content, author_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "post", post.id, "user"))
    }

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ApiResult<Post> {
        let sql = format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content)
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(input.title)
            .bind(input.content)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "post", id, "user"))?
            .ok_or_else(|| ApiError::not_found("post", id))
    }

    async fn delete_post(&self, id: Uuid) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_read_error)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("post", id));
        }
        Ok(())
    }

    // ---- subscriptions ----

    async fn authors_for_subscribers(
        &self,
        subscriber_ids: &[Uuid],
    ) -> ApiResult<Vec<LinkedUser>> {
        let sql = format!(
            r#"
            SELECT s.subscriber_id AS link_id, {}
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.subscriber_id = ANY($1)
            "#,
            USER_COLUMNS_ALIASED
        );
        sqlx::query_as::<_, LinkedUser>(&sql)
            .bind(subscriber_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn subscribers_for_authors(&self, author_ids: &[Uuid]) -> ApiResult<Vec<LinkedUser>> {
        let sql = format!(
            r#"
            SELECT s.author_id AS link_id, {}
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.author_id = ANY($1)
            "#,
            USER_COLUMNS_ALIASED
        );
        sqlx::query_as::<_, LinkedUser>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_read_error)
    }

    async fn subscribe(&self, edge: SubscriptionEdge) -> ApiResult<()> {
        sqlx::query("INSERT INTO subscriptions (subscriber_id, author_id) VALUES ($1, $2)")
            .bind(edge.subscriber_id)
            .bind(edge.author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_write_error(
                    e,
                    "subscription",
                    format!("{} -> {}", edge.subscriber_id, edge.author_id),
                    "user",
                )
            })?;
        Ok(())
    }

    async fn unsubscribe(&self, edge: SubscriptionEdge) -> ApiResult<()> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND author_id = $2")
                .bind(edge.subscriber_id)
                .bind(edge.author_id)
                .execute(&self.pool)
                .await
                .map_err(map_read_error)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(
                "subscription",
                format!("{} -> {}", edge.subscriber_id, edge.author_id),
            ));
        }
        Ok(())
    }
}
