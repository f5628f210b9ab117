//! Data access layer for Memberhub
//!
//! Every resolver and loader talks to persisted state through the [`Store`]
//! trait. Two implementations ship with the API:
//! - [`PgStore`]: PostgreSQL via sqlx, used in every real deployment
//! - [`MemoryStore`]: in-process tables, used by tests and local demos
//!
//! Grouped fetches (`*_by_*_ids`, `*_for_*`) take a set of parent keys and
//! return every matching row in one round trip; the GraphQL loaders partition
//! the rows back per key.

pub mod memory;
pub mod postgres;
pub mod utils;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::member_type::{MemberType, MemberTypeId};
use crate::models::post::{CreatePost, Post, UpdatePost};
use crate::models::profile::{CreateProfile, Profile, UpdateProfile};
use crate::models::subscription::{LinkedUser, SubscriptionEdge};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Shared handle to the configured store
pub type SharedStore = Arc<dyn Store>;

/// Relational data-access capability consumed by the GraphQL layer
///
/// Lookups by id return `Ok(None)` when the row is absent. Updates and deletes
/// of absent rows return [`ApiError::NotFound`](crate::error::ApiError).
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> ApiResult<()>;

    // ---- member types ----

    async fn list_member_types(&self) -> ApiResult<Vec<MemberType>>;

    async fn find_member_type(&self, id: MemberTypeId) -> ApiResult<Option<MemberType>>;

    /// Grouped fetch: member types whose id is in `ids`
    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> ApiResult<Vec<MemberType>>;

    // ---- users ----

    async fn list_users(&self) -> ApiResult<Vec<User>>;

    async fn find_user(&self, id: Uuid) -> ApiResult<Option<User>>;

    async fn create_user(&self, input: CreateUser) -> ApiResult<User>;

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> ApiResult<User>;

    /// Deletes the user together with their profile, posts and subscription edges
    async fn delete_user(&self, id: Uuid) -> ApiResult<()>;

    // ---- profiles ----

    async fn list_profiles(&self) -> ApiResult<Vec<Profile>>;

    async fn find_profile(&self, id: Uuid) -> ApiResult<Option<Profile>>;

    /// Grouped fetch: profiles whose `user_id` is in `user_ids`
    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Profile>>;

    async fn create_profile(&self, input: CreateProfile) -> ApiResult<Profile>;

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> ApiResult<Profile>;

    async fn delete_profile(&self, id: Uuid) -> ApiResult<()>;

    // ---- posts ----

    async fn list_posts(&self) -> ApiResult<Vec<Post>>;

    async fn find_post(&self, id: Uuid) -> ApiResult<Option<Post>>;

    /// Grouped fetch: posts whose `author_id` is in `author_ids`
    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> ApiResult<Vec<Post>>;

    async fn create_post(&self, input: CreatePost) -> ApiResult<Post>;

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ApiResult<Post>;

    async fn delete_post(&self, id: Uuid) -> ApiResult<()>;

    // ---- subscriptions ----

    /// Grouped fetch: authors followed by each subscriber in `subscriber_ids`
    ///
    /// `link_id` on each row is the subscriber id.
    async fn authors_for_subscribers(&self, subscriber_ids: &[Uuid])
        -> ApiResult<Vec<LinkedUser>>;

    /// Grouped fetch: subscribers of each author in `author_ids`
    ///
    /// `link_id` on each row is the author id.
    async fn subscribers_for_authors(&self, author_ids: &[Uuid]) -> ApiResult<Vec<LinkedUser>>;

    async fn subscribe(&self, edge: SubscriptionEdge) -> ApiResult<()>;

    async fn unsubscribe(&self, edge: SubscriptionEdge) -> ApiResult<()>;
}
