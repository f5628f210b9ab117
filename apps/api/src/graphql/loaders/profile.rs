//! Profile-by-user DataLoader
//!
//! Batches `User.profile` lookups into one grouped fetch keyed by user id.

use async_graphql::dataloader::Loader;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Profile;
use crate::repositories::SharedStore;

use super::shared_error;

/// DataLoader for batching profile lookups by owning user
#[derive(Clone)]
pub struct ProfileByUserLoader {
    store: SharedStore,
}

impl ProfileByUserLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for ProfileByUserLoader {
    type Value = Option<Profile>;
    type Error = Arc<ApiError>;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        tracing::debug!(keys = keys.len(), "Batch loading profiles");

        let profiles = self
            .store
            .profiles_by_user_ids(keys)
            .await
            .map_err(shared_error)?;

        // Every requested key gets an entry so users without a profile are memoized too
        let mut result: HashMap<Uuid, Option<Profile>> =
            keys.iter().map(|key| (*key, None)).collect();
        for profile in profiles {
            result.insert(profile.user_id, Some(profile));
        }

        Ok(result)
    }
}
