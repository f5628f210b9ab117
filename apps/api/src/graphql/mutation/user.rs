//! User mutations
//!
//! - createUser: Create a user
//! - changeUser: Partially update a user
//! - deleteUser: Delete a user with their profile, posts and subscriptions

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::to_graphql_error;
use crate::graphql::types::{ChangeUserInput, CreateUserInput, User};
use crate::repositories::SharedStore;

use super::apply_failure_policy;

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    /// Create a new user
    async fn create_user(&self, ctx: &Context<'_>, dto: CreateUserInput) -> Result<User> {
        let store = ctx.data::<SharedStore>()?;
        let user = store
            .create_user(dto.into())
            .await
            .map_err(to_graphql_error)?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(User::from(user))
    }

    /// Update the given fields of a user
    async fn change_user(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeUserInput,
    ) -> Result<Option<User>> {
        let store = ctx.data::<SharedStore>()?;
        let result = store.update_user(id, dto.into()).await;
        Ok(apply_failure_policy(ctx, "changeUser", result)?.map(User::from))
    }

    /// Delete a user
    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let store = ctx.data::<SharedStore>()?;
        let result = store.delete_user(id).await;
        Ok(apply_failure_policy(ctx, "deleteUser", result)?.is_some())
    }
}
