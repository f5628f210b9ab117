//! Posts-by-author DataLoader
//!
//! Batches `User.posts` lookups into a single grouped fetch, then partitions
//! the rows back per author.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Post;
use crate::repositories::SharedStore;

use super::shared_error;

/// DataLoader for batching posts-by-author queries
#[derive(Clone)]
pub struct PostsByAuthorLoader {
    store: SharedStore,
}

impl PostsByAuthorLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for PostsByAuthorLoader {
    type Value = Vec<Post>;
    type Error = Arc<ApiError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(keys = keys.len(), "Batch loading posts");

        let posts = self
            .store
            .posts_by_author_ids(keys)
            .await
            .map_err(shared_error)?;

        let mut result: HashMap<Uuid, Vec<Post>> = HashMap::new();
        for post in posts {
            result.entry(post.author_id).or_default().push(post);
        }

        // Ensure all requested keys have an entry (even if empty)
        for key in keys {
            result.entry(*key).or_default();
        }

        Ok(result)
    }
}
