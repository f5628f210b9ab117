//! Post GraphQL types

use async_graphql::{InputObject, SimpleObject};
use uuid::Uuid;

use crate::models::post::{CreatePost, Post as DbPost, UpdatePost};

/// Post exposed via GraphQL
#[derive(Debug, Clone, SimpleObject)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Id of the user who wrote the post
    pub author_id: Uuid,
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
        }
    }
}

/// Input for `createPost`
#[derive(Debug, InputObject)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

impl From<CreatePostInput> for CreatePost {
    fn from(input: CreatePostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
            author_id: input.author_id,
        }
    }
}

/// Input for `changePost`; omitted fields keep their value
#[derive(Debug, InputObject)]
pub struct ChangePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<ChangePostInput> for UpdatePost {
    fn from(input: ChangePostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
        }
    }
}
