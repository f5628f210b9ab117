//! User queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::to_graphql_error;
use crate::graphql::types::User;
use crate::repositories::SharedStore;

/// User queries, including the entry point into the relationship graph
#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// List all users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let store = ctx.data::<SharedStore>()?;
        let users = store.list_users().await.map_err(to_graphql_error)?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Get a user by id
    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        let store = ctx.data::<SharedStore>()?;
        let user = store.find_user(id).await.map_err(to_graphql_error)?;
        Ok(user.map(User::from))
    }
}
