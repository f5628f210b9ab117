//! Post mutations

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::to_graphql_error;
use crate::graphql::types::{ChangePostInput, CreatePostInput, Post};
use crate::repositories::SharedStore;

use super::apply_failure_policy;

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    /// Create a post for an existing author
    async fn create_post(&self, ctx: &Context<'_>, dto: CreatePostInput) -> Result<Post> {
        let store = ctx.data::<SharedStore>()?;
        let post = store
            .create_post(dto.into())
            .await
            .map_err(to_graphql_error)?;
        Ok(Post::from(post))
    }

    async fn change_post(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangePostInput,
    ) -> Result<Option<Post>> {
        let store = ctx.data::<SharedStore>()?;
        let result = store.update_post(id, dto.into()).await;
        Ok(apply_failure_policy(ctx, "changePost", result)?.map(Post::from))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let store = ctx.data::<SharedStore>()?;
        let result = store.delete_post(id).await;
        Ok(apply_failure_policy(ctx, "deletePost", result)?.is_some())
    }
}
