//! Post model for Memberhub

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post record from the posts table
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Post {
    /// Unique post identifier
    pub id: Uuid,

    /// Post title
    pub title: String,

    /// Post body
    pub content: String,

    /// User who wrote the post
    pub author_id: Uuid,
}

/// Post creation input
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

/// Partial post update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Post {
    /// Build a new post row with a fresh identifier
    pub fn create(input: CreatePost) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            author_id: input.author_id,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, update: UpdatePost) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
    }
}
