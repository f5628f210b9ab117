//! Subscription edges between users
//!
//! A subscription is a directed edge from a subscriber to an author. Both
//! sides reference rows in the users table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::User;

/// Directed subscriber → author edge, unique per pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionEdge {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
}

impl SubscriptionEdge {
    pub fn new(subscriber_id: Uuid, author_id: Uuid) -> Self {
        Self {
            subscriber_id,
            author_id,
        }
    }
}

/// A user reached through a subscription edge, tagged with the id on the
/// other side of the edge (the batching key).
#[derive(Debug, Clone, FromRow)]
pub struct LinkedUser {
    /// Id of the user the lookup started from
    pub link_id: Uuid,

    /// User on the far side of the edge
    #[sqlx(flatten)]
    pub user: User,
}
