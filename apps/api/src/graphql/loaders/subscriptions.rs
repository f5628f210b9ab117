//! Subscription edge DataLoaders
//!
//! Both directions of the subscriber/author relation are batched the same
//! way: one grouped fetch returns users tagged with the id the lookup started
//! from, and the rows are partitioned back on that tag.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{LinkedUser, User};
use crate::repositories::SharedStore;

use super::shared_error;

fn group_linked(keys: &[Uuid], rows: Vec<LinkedUser>) -> HashMap<Uuid, Vec<User>> {
    let mut result: HashMap<Uuid, Vec<User>> = HashMap::new();
    for row in rows {
        result.entry(row.link_id).or_default().push(row.user);
    }
    for key in keys {
        result.entry(*key).or_default();
    }
    result
}

/// `User.userSubscribedTo`: authors followed by each subscriber
#[derive(Clone)]
pub struct AuthorsBySubscriberLoader {
    store: SharedStore,
}

impl AuthorsBySubscriberLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for AuthorsBySubscriberLoader {
    type Value = Vec<User>;
    type Error = Arc<ApiError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(keys = keys.len(), "Batch loading subscribed authors");

        let rows = self
            .store
            .authors_for_subscribers(keys)
            .await
            .map_err(shared_error)?;
        Ok(group_linked(keys, rows))
    }
}

/// `User.subscribedToUser`: subscribers of each author
#[derive(Clone)]
pub struct SubscribersByAuthorLoader {
    store: SharedStore,
}

impl SubscribersByAuthorLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for SubscribersByAuthorLoader {
    type Value = Vec<User>;
    type Error = Arc<ApiError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(keys = keys.len(), "Batch loading subscribers");

        let rows = self
            .store
            .subscribers_for_authors(keys)
            .await
            .map_err(shared_error)?;
        Ok(group_linked(keys, rows))
    }
}
