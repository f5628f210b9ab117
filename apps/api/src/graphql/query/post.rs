//! Post queries
//!
//! Posts are flat records; their author is reachable through `User.posts`.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::to_graphql_error;
use crate::graphql::types::Post;
use crate::repositories::SharedStore;

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// List all posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let store = ctx.data::<SharedStore>()?;
        let posts = store.list_posts().await.map_err(to_graphql_error)?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// Get a post by id
    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Post>> {
        let store = ctx.data::<SharedStore>()?;
        let post = store.find_post(id).await.map_err(to_graphql_error)?;
        Ok(post.map(Post::from))
    }
}
