//! In-process store
//!
//! Keeps every table in memory behind a single `RwLock`. Used by the test
//! suite and by `STORE_BACKEND=memory` for local demos.
//!
//! Besides the [`Store`] contract the memory store records how many times each
//! operation was invoked ([`MemoryStore::call_count`]) and can be told to fail a
//! given operation ([`MemoryStore::fail_on`]), which is how the batching
//! behaviour of the GraphQL loaders is observed in tests.
//!
//! Locks recover from poisoning with `unwrap_or_else(|e| e.into_inner())`, so a
//! panicking test cannot wedge the store for the rest of the suite.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::member_type::{MemberType, MemberTypeId};
use crate::models::post::{CreatePost, Post, UpdatePost};
use crate::models::profile::{CreateProfile, Profile, UpdateProfile};
use crate::models::subscription::{LinkedUser, SubscriptionEdge};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Operation names as recorded by the call counters
pub mod ops {
    pub const PING: &str = "ping";
    pub const LIST_MEMBER_TYPES: &str = "list_member_types";
    pub const FIND_MEMBER_TYPE: &str = "find_member_type";
    pub const MEMBER_TYPES_BY_IDS: &str = "member_types_by_ids";
    pub const LIST_USERS: &str = "list_users";
    pub const FIND_USER: &str = "find_user";
    pub const CREATE_USER: &str = "create_user";
    pub const UPDATE_USER: &str = "update_user";
    pub const DELETE_USER: &str = "delete_user";
    pub const LIST_PROFILES: &str = "list_profiles";
    pub const FIND_PROFILE: &str = "find_profile";
    pub const PROFILES_BY_USER_IDS: &str = "profiles_by_user_ids";
    pub const CREATE_PROFILE: &str = "create_profile";
    pub const UPDATE_PROFILE: &str = "update_profile";
    pub const DELETE_PROFILE: &str = "delete_profile";
    pub const LIST_POSTS: &str = "list_posts";
    pub const FIND_POST: &str = "find_post";
    pub const POSTS_BY_AUTHOR_IDS: &str = "posts_by_author_ids";
    pub const CREATE_POST: &str = "create_post";
    pub const UPDATE_POST: &str = "update_post";
    pub const DELETE_POST: &str = "delete_post";
    pub const AUTHORS_FOR_SUBSCRIBERS: &str = "authors_for_subscribers";
    pub const SUBSCRIBERS_FOR_AUTHORS: &str = "subscribers_for_authors";
    pub const SUBSCRIBE: &str = "subscribe";
    pub const UNSUBSCRIBE: &str = "unsubscribe";
}

/// Row storage. Vectors keep insertion order so listings are stable.
#[derive(Debug, Default)]
struct Tables {
    member_types: Vec<MemberType>,
    users: Vec<User>,
    profiles: Vec<Profile>,
    posts: Vec<Post>,
    subscriptions: Vec<SubscriptionEdge>,
}

impl Tables {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn member_type_exists(&self, id: MemberTypeId) -> bool {
        self.member_types.iter().any(|m| m.id == id)
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

/// In-memory [`Store`] implementation
///
/// Clones share the same tables and counters.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    calls: Arc<RwLock<HashMap<&'static str, usize>>>,
    failing: Arc<RwLock<HashSet<&'static str>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store seeded with the member type reference rows
    pub fn new() -> Self {
        let tables = Tables {
            member_types: MemberType::seed(),
            ..Tables::default()
        };

        Self {
            tables: Arc::new(RwLock::new(tables)),
            calls: Arc::new(RwLock::new(HashMap::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// How many times `op` has been invoked since creation or the last reset
    pub fn call_count(&self, op: &str) -> usize {
        let calls = self.calls.read().unwrap_or_else(|e| e.into_inner());
        calls.get(op).copied().unwrap_or(0)
    }

    /// Sum of all recorded invocations
    pub fn total_calls(&self) -> usize {
        let calls = self.calls.read().unwrap_or_else(|e| e.into_inner());
        calls.values().sum()
    }

    /// Forget all recorded invocations
    pub fn reset_calls(&self) {
        let mut calls = self.calls.write().unwrap_or_else(|e| e.into_inner());
        calls.clear();
    }

    /// Make every subsequent call to `op` fail with an internal error
    pub fn fail_on(&self, op: &'static str) {
        let mut failing = self.failing.write().unwrap_or_else(|e| e.into_inner());
        failing.insert(op);
    }

    /// Undo every [`fail_on`](Self::fail_on)
    pub fn clear_failures(&self) {
        let mut failing = self.failing.write().unwrap_or_else(|e| e.into_inner());
        failing.clear();
    }

    fn record(&self, op: &'static str) -> ApiResult<()> {
        {
            let mut calls = self.calls.write().unwrap_or_else(|e| e.into_inner());
            *calls.entry(op).or_insert(0) += 1;
        }

        let failing = self.failing.read().unwrap_or_else(|e| e.into_inner());
        if failing.contains(op) {
            return Err(ApiError::Internal(format!("injected failure in {}", op)));
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> ApiResult<()> {
        self.record(ops::PING)
    }

    // ---- member types ----

    async fn list_member_types(&self) -> ApiResult<Vec<MemberType>> {
        self.record(ops::LIST_MEMBER_TYPES)?;
        Ok(self.read().member_types.clone())
    }

    async fn find_member_type(&self, id: MemberTypeId) -> ApiResult<Option<MemberType>> {
        self.record(ops::FIND_MEMBER_TYPE)?;
        Ok(self.read().member_types.iter().find(|m| m.id == id).cloned())
    }

    async fn member_types_by_ids(&self, ids: &[MemberTypeId]) -> ApiResult<Vec<MemberType>> {
        self.record(ops::MEMBER_TYPES_BY_IDS)?;
        Ok(self
            .read()
            .member_types
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }

    // ---- users ----

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.record(ops::LIST_USERS)?;
        Ok(self.read().users.clone())
    }

    async fn find_user(&self, id: Uuid) -> ApiResult<Option<User>> {
        self.record(ops::FIND_USER)?;
        Ok(self.read().user(id).cloned())
    }

    async fn create_user(&self, input: CreateUser) -> ApiResult<User> {
        self.record(ops::CREATE_USER)?;
        let user = User::create(input);
        self.write().users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> ApiResult<User> {
        self.record(ops::UPDATE_USER)?;
        let mut tables = self.write();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| ApiError::not_found("user", id))?;
        user.apply(input);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> ApiResult<()> {
        self.record(ops::DELETE_USER)?;
        let mut tables = self.write();
        if !tables.user_exists(id) {
            return Err(ApiError::not_found("user", id));
        }

        tables.users.retain(|u| u.id != id);
        tables.profiles.retain(|p| p.user_id != id);
        tables.posts.retain(|p| p.author_id != id);
        tables
            .subscriptions
            .retain(|s| s.subscriber_id != id && s.author_id != id);
        Ok(())
    }

    // ---- profiles ----

    async fn list_profiles(&self) -> ApiResult<Vec<Profile>> {
        self.record(ops::LIST_PROFILES)?;
        Ok(self.read().profiles.clone())
    }

    async fn find_profile(&self, id: Uuid) -> ApiResult<Option<Profile>> {
        self.record(ops::FIND_PROFILE)?;
        Ok(self.read().profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn profiles_by_user_ids(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Profile>> {
        self.record(ops::PROFILES_BY_USER_IDS)?;
        Ok(self
            .read()
            .profiles
            .iter()
            .filter(|p| user_ids.contains(&p.user_id))
            .cloned()
            .collect())
    }

    async fn create_profile(&self, input: CreateProfile) -> ApiResult<Profile> {
        self.record(ops::CREATE_PROFILE)?;
        let mut tables = self.write();

        if !tables.user_exists(input.user_id) {
            return Err(ApiError::not_found("user", input.user_id));
        }
        if !tables.member_type_exists(input.member_type_id) {
            return Err(ApiError::not_found("member type", input.member_type_id));
        }
        if tables.profiles.iter().any(|p| p.user_id == input.user_id) {
            return Err(ApiError::conflict("profile for user", input.user_id));
        }

        let profile = Profile::create(input);
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> ApiResult<Profile> {
        self.record(ops::UPDATE_PROFILE)?;
        let mut tables = self.write();

        if let Some(member_type_id) = input.member_type_id {
            if !tables.member_type_exists(member_type_id) {
                return Err(ApiError::not_found("member type", member_type_id));
            }
        }

        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("profile", id))?;
        profile.apply(input);
        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: Uuid) -> ApiResult<()> {
        self.record(ops::DELETE_PROFILE)?;
        let mut tables = self.write();
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.id != id);
        if tables.profiles.len() == before {
            return Err(ApiError::not_found("profile", id));
        }
        Ok(())
    }

    // ---- posts ----

    async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        self.record(ops::LIST_POSTS)?;
        Ok(self.read().posts.clone())
    }

    async fn find_post(&self, id: Uuid) -> ApiResult<Option<Post>> {
        self.record(ops::FIND_POST)?;
        Ok(self.read().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn posts_by_author_ids(&self, author_ids: &[Uuid]) -> ApiResult<Vec<Post>> {
        self.record(ops::POSTS_BY_AUTHOR_IDS)?;
        Ok(self
            .read()
            .posts
            .iter()
            .filter(|p| author_ids.contains(&p.author_id))
            .cloned()
            .collect())
    }

    async fn create_post(&self, input: CreatePost) -> ApiResult<Post> {
        self.record(ops::CREATE_POST)?;
        let mut tables = self.write();
        if !tables.user_exists(input.author_id) {
            return Err(ApiError::not_found("user", input.author_id));
        }

        let post = Post::create(input);
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ApiResult<Post> {
        self.record(ops::UPDATE_POST)?;
        let mut tables = self.write();
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::not_found("post", id))?;
        post.apply(input);
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> ApiResult<()> {
        self.record(ops::DELETE_POST)?;
        let mut tables = self.write();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(ApiError::not_found("post", id));
        }
        Ok(())
    }

    // ---- subscriptions ----

    async fn authors_for_subscribers(
        &self,
        subscriber_ids: &[Uuid],
    ) -> ApiResult<Vec<LinkedUser>> {
        self.record(ops::AUTHORS_FOR_SUBSCRIBERS)?;
        let tables = self.read();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| subscriber_ids.contains(&s.subscriber_id))
            .filter_map(|s| {
                tables.user(s.author_id).map(|user| LinkedUser {
                    link_id: s.subscriber_id,
                    user: user.clone(),
                })
            })
            .collect())
    }

    async fn subscribers_for_authors(&self, author_ids: &[Uuid]) -> ApiResult<Vec<LinkedUser>> {
        self.record(ops::SUBSCRIBERS_FOR_AUTHORS)?;
        let tables = self.read();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| author_ids.contains(&s.author_id))
            .filter_map(|s| {
                tables.user(s.subscriber_id).map(|user| LinkedUser {
                    link_id: s.author_id,
                    user: user.clone(),
                })
            })
            .collect())
    }

    async fn subscribe(&self, edge: SubscriptionEdge) -> ApiResult<()> {
        self.record(ops::SUBSCRIBE)?;
        let mut tables = self.write();

        for id in [edge.subscriber_id, edge.author_id] {
            if !tables.user_exists(id) {
                return Err(ApiError::not_found("user", id));
            }
        }
        if tables.subscriptions.contains(&edge) {
            return Err(ApiError::conflict(
                "subscription",
                format!("{} -> {}", edge.subscriber_id, edge.author_id),
            ));
        }

        tables.subscriptions.push(edge);
        Ok(())
    }

    async fn unsubscribe(&self, edge: SubscriptionEdge) -> ApiResult<()> {
        self.record(ops::UNSUBSCRIBE)?;
        let mut tables = self.write();
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|s| *s != edge);
        if tables.subscriptions.len() == before {
            return Err(ApiError::not_found(
                "subscription",
                format!("{} -> {}", edge.subscriber_id, edge.author_id),
            ));
        }
        Ok(())
    }
}
