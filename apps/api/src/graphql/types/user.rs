//! User GraphQL types
//!
//! `User` is recursive through the subscription relations. Every relationship
//! field goes through the request's loader registry, so nested lists of users
//! cost one grouped fetch per relation and nesting level.

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::graphql::loaders::RequestLoaders;
use crate::models::user::{CreateUser, UpdateUser, User as DbUser};

use super::post::Post;
use super::profile::Profile;

/// User exposed via GraphQL
pub struct User {
    inner: DbUser,
}

impl User {
    /// Create a new GraphQL User from a database User
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    /// Unique user identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Display name
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Account balance
    async fn balance(&self) -> f64 {
        self.inner.balance
    }

    /// The user's profile, if one was created
    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        let loaders = RequestLoaders::from_context(ctx)?;
        let profile = loaders
            .profiles()
            .load_one(self.inner.id)
            .await
            .map_err(|e| e.as_graphql_error())?
            .flatten();
        Ok(profile.map(Profile::from))
    }

    /// Posts written by the user
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let loaders = RequestLoaders::from_context(ctx)?;
        let posts = loaders
            .posts()
            .load_one(self.inner.id)
            .await
            .map_err(|e| e.as_graphql_error())?
            .unwrap_or_default();
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// Authors this user is subscribed to
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = RequestLoaders::from_context(ctx)?;
        let authors = loaders
            .subscribed_authors()
            .load_one(self.inner.id)
            .await
            .map_err(|e| e.as_graphql_error())?
            .unwrap_or_default();
        Ok(authors.into_iter().map(User::from).collect())
    }

    /// Users subscribed to this user
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let loaders = RequestLoaders::from_context(ctx)?;
        let subscribers = loaders
            .subscribers()
            .load_one(self.inner.id)
            .await
            .map_err(|e| e.as_graphql_error())?
            .unwrap_or_default();
        Ok(subscribers.into_iter().map(User::from).collect())
    }
}

/// Input for `createUser`
#[derive(Debug, InputObject)]
pub struct CreateUserInput {
    pub name: String,
    #[graphql(default)]
    pub balance: f64,
}

impl From<CreateUserInput> for CreateUser {
    fn from(input: CreateUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}

/// Input for `changeUser`; omitted fields keep their value
#[derive(Debug, InputObject)]
pub struct ChangeUserInput {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl From<ChangeUserInput> for UpdateUser {
    fn from(input: ChangeUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}
